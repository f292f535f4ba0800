use std::f64::consts::{PI, TAU};

use crate::foundation::core::Resolution;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::foundation::math::snap_unit;
use crate::geometry::coord::{Coord3dCart, Coord3dSpherical, CoordF, CoordI};
use crate::geometry::quaternion::rotation;
use crate::layout::view::{LayoutBase, LayoutView, NormalizedFaceInfo};
use crate::orientation::dynamic_position::DynamicPosition;

/// A single flat view of the sphere: the picture spans a horizontal and a vertical angle of
/// vision around the current viewing orientation.
///
/// Columns map linearly to azimuth and rows to polar angle, centered on the view direction.
#[derive(Clone, Debug)]
pub struct FlatFixedLayout {
    base: LayoutBase,
    horizontal_fov: f64,
    vertical_fov: f64,
}

impl FlatFixedLayout {
    /// Build a `width x height` view with angles of vision in radians.
    pub fn new(
        width: u32,
        height: u32,
        horizontal_fov: f64,
        vertical_fov: f64,
        position: DynamicPosition,
    ) -> LayoutResult<Self> {
        if width == 0 || height == 0 {
            return Err(LayoutError::validation(format!(
                "flat layout needs a non-empty size, got {width}x{height}"
            )));
        }
        if !(horizontal_fov.is_finite() && horizontal_fov > 0.0 && horizontal_fov <= TAU) {
            return Err(LayoutError::validation(format!(
                "horizontal angle of vision must be in (0, 2π], got {horizontal_fov}"
            )));
        }
        if !(vertical_fov.is_finite() && vertical_fov > 0.0 && vertical_fov <= PI) {
            return Err(LayoutError::validation(format!(
                "vertical angle of vision must be in (0, π], got {vertical_fov}"
            )));
        }
        Ok(Self {
            base: LayoutBase::new(width, height).with_position(position),
            horizontal_fov,
            vertical_fov,
        })
    }

    /// Horizontal angle of vision (radians).
    pub fn horizontal_fov(&self) -> f64 {
        self.horizontal_fov
    }

    /// Vertical angle of vision (radians).
    pub fn vertical_fov(&self) -> f64 {
        self.vertical_fov
    }
}

impl LayoutView for FlatFixedLayout {
    fn kind(&self) -> &'static str {
        "flatFixed"
    }

    fn base(&self) -> &LayoutBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayoutBase {
        &mut self.base
    }

    fn reference_resolution(&self) -> Resolution {
        self.resolution()
    }

    fn from_2d_to_normalized_face_info(&self, pixel: CoordI) -> NormalizedFaceInfo {
        NormalizedFaceInfo::new(
            CoordF::new(
                f64::from(pixel.x) / f64::from(self.width()),
                f64::from(pixel.y) / f64::from(self.height()),
            ),
            0,
        )
    }

    fn from_normalized_info_to_2d(&self, info: NormalizedFaceInfo) -> CoordF {
        CoordF::new(
            info.coord.x * f64::from(self.width()),
            info.coord.y * f64::from(self.height()),
        )
    }

    fn from_3d_to_normalized_face_info(&self, point: Coord3dSpherical) -> NormalizedFaceInfo {
        let local = rotation(point, self.base.orientation().inv());
        NormalizedFaceInfo::new(
            CoordF::new(
                snap_unit(0.5 + local.theta / self.horizontal_fov),
                snap_unit(0.5 + (local.phi - PI / 2.0) / self.vertical_fov),
            ),
            0,
        )
    }

    fn from_normalized_info_to_3d(&self, info: NormalizedFaceInfo) -> Coord3dCart {
        let local = Coord3dSpherical::on_unit_sphere(
            (info.coord.x - 0.5) * self.horizontal_fov,
            PI / 2.0 + (info.coord.y - 0.5) * self.vertical_fov,
        );
        Coord3dCart::from(rotation(local, self.base.orientation()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/flat_fixed.rs"]
mod tests;
