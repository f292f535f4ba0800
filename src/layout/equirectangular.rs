use std::f64::consts::{PI, TAU};

use crate::foundation::core::Resolution;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::foundation::math::snap_unit;
use crate::geometry::coord::{Coord3dCart, Coord3dSpherical, CoordF, CoordI};
use crate::geometry::quaternion::rotation;
use crate::layout::view::{LayoutBase, LayoutView, NormalizedFaceInfo};
use crate::orientation::dynamic_position::DynamicPosition;

/// Whole-sphere layout: columns span the full azimuth and rows span pole to pole.
///
/// The view direction sits at the picture center; the left and right borders meet behind it.
#[derive(Clone, Debug)]
pub struct EquirectangularLayout {
    base: LayoutBase,
}

impl EquirectangularLayout {
    /// Build a `width x height` equirectangular layout.
    pub fn new(width: u32, height: u32, position: DynamicPosition) -> LayoutResult<Self> {
        if width == 0 || height == 0 {
            return Err(LayoutError::validation(format!(
                "equirectangular layout needs a non-empty size, got {width}x{height}"
            )));
        }
        Ok(Self {
            base: LayoutBase::new(width, height).with_position(position),
        })
    }
}

impl LayoutView for EquirectangularLayout {
    fn kind(&self) -> &'static str {
        "equirectangular"
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
        let h = f64::from(self.height());
        let mut y = info.coord.y * h;
        // The south pole lands on the bottom edge; sample the last row for it.
        if y == h {
            y = h - 1.0;
        }
        CoordF::new(info.coord.x * f64::from(self.width()), y)
    }

    fn from_3d_to_normalized_face_info(&self, point: Coord3dSpherical) -> NormalizedFaceInfo {
        let local = rotation(point, self.base.orientation().inv());
        let mut u = snap_unit(0.5 + local.theta / TAU);
        // theta = π and theta = -π are the same meridian.
        if u >= 1.0 {
            u -= 1.0;
        }
        NormalizedFaceInfo::new(CoordF::new(u, snap_unit(local.phi / PI)), 0)
    }

    fn from_normalized_info_to_3d(&self, info: NormalizedFaceInfo) -> Coord3dCart {
        let local =
            Coord3dSpherical::on_unit_sphere((info.coord.x - 0.5) * TAU, info.coord.y * PI);
        Coord3dCart::from(rotation(local, self.base.orientation()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/equirectangular.rs"]
mod tests;
