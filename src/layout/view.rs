//! The layout contract.
//!
//! A layout describes how the unit sphere is laid out on a rectangular picture. Concrete
//! layouts implement the four mapping primitives of [`LayoutView`]; everything built on top of
//! them (sphere-mediated composition, remapping, surface weighting) lives in [`LayoutViewExt`],
//! which is implemented for every layout and cannot be overridden.

use crate::foundation::core::Resolution;
use crate::foundation::error::LayoutResult;
use crate::geometry::coord::{Coord3dCart, Coord3dSpherical, CoordF, CoordI};
use crate::geometry::quaternion::Quaternion;
use crate::orientation::dynamic_position::DynamicPosition;
use crate::picture::buffer::Picture;
use crate::picture::interpolate::Interpolation;

/// A facet identifier plus a coordinate normalized to `[0, 1] x [0, 1]` within that facet.
///
/// Single-facet layouts always use face `0`. Negative ids mean "no facet".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedFaceInfo {
    /// Coordinate inside the facet.
    pub coord: CoordF,
    /// Facet identifier.
    pub face_id: i32,
}

impl NormalizedFaceInfo {
    /// Build a normalized face info.
    pub const fn new(coord: CoordF, face_id: i32) -> Self {
        Self { coord, face_id }
    }
}

/// State every concrete layout carries.
#[derive(Clone, Debug)]
pub struct LayoutBase {
    width: u32,
    height: u32,
    interpolation: Interpolation,
    position: DynamicPosition,
    initialized: bool,
}

impl LayoutBase {
    /// Base state for a `width x height` picture with a fixed identity orientation.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            interpolation: Interpolation::default(),
            position: DynamicPosition::default(),
            initialized: false,
        }
    }

    /// Replace the orientation model.
    pub fn with_position(mut self, position: DynamicPosition) -> Self {
        self.position = position;
        self
    }

    /// Output picture size.
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Current viewing orientation.
    pub fn orientation(&self) -> Quaternion {
        self.position.get_next_position()
    }

    /// Orientation model.
    pub fn position(&self) -> &DynamicPosition {
        &self.position
    }
}

/// Capability set of a layout.
///
/// Layouts are read concurrently during remapping (`&self` only); time-dependent state is
/// advanced between frames through [`LayoutView::next_step`].
pub trait LayoutView: Send + Sync {
    /// Short human-readable kind (`"flatFixed"`, `"cubeMap"`, ...).
    fn kind(&self) -> &'static str;

    /// Shared state.
    fn base(&self) -> &LayoutBase;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut LayoutBase;

    /// One-time setup hook run by [`LayoutView::init`].
    fn init_impl(&mut self) -> LayoutResult<()> {
        Ok(())
    }

    /// Run the one-time setup. Calls after the first success are no-ops.
    fn init(&mut self) -> LayoutResult<()> {
        if !self.base().initialized {
            self.init_impl()?;
            self.base_mut().initialized = true;
        }
        Ok(())
    }

    /// `true` once [`LayoutView::init`] succeeded.
    fn is_initialized(&self) -> bool {
        self.base().initialized
    }

    /// Advance time-dependent state to `relative_timestamp` seconds from the video start.
    fn next_step(&mut self, relative_timestamp: f64) {
        self.base_mut().position.set_next_position(relative_timestamp);
    }

    /// Output picture width.
    fn width(&self) -> u32 {
        self.base().width
    }

    /// Output picture height.
    fn height(&self) -> u32 {
        self.base().height
    }

    /// Output picture size.
    fn resolution(&self) -> Resolution {
        self.base().resolution()
    }

    /// Sampling used when this layout is the source of a remap.
    fn interpolation(&self) -> Interpolation {
        self.base().interpolation
    }

    /// Change the sampling used when this layout is the source of a remap.
    fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.base_mut().interpolation = interpolation;
    }

    /// Size used by chained layouts to derive relative sizes.
    fn reference_resolution(&self) -> Resolution;

    /// Facet and normalized coordinate of a pixel lattice point.
    fn from_2d_to_normalized_face_info(&self, pixel: CoordI) -> NormalizedFaceInfo;

    /// Pixel-space coordinate of a normalized facet coordinate.
    fn from_normalized_info_to_2d(&self, info: NormalizedFaceInfo) -> CoordF;

    /// Facet and normalized coordinate of a point on the sphere.
    fn from_3d_to_normalized_face_info(&self, point: Coord3dSpherical) -> NormalizedFaceInfo;

    /// Point on the sphere of a normalized facet coordinate.
    ///
    /// Returns the zero vector or a NaN vector where no surface maps.
    fn from_normalized_info_to_3d(&self, info: NormalizedFaceInfo) -> Coord3dCart;
}

/// Operations derived from the [`LayoutView`] primitives. Implemented for every layout.
pub trait LayoutViewExt: LayoutView {
    /// Sphere point seen by a pixel.
    fn from_2d_to_3d(&self, pixel: CoordI) -> Coord3dCart {
        self.from_normalized_info_to_3d(self.from_2d_to_normalized_face_info(pixel))
    }

    /// Pixel-space coordinate of a sphere point.
    fn from_sphere_to_2d(&self, point: Coord3dSpherical) -> CoordF {
        self.from_normalized_info_to_2d(self.from_3d_to_normalized_face_info(point))
    }

    /// Approximate sphere area covered by `pixel`.
    fn get_surface_pixel(&self, pixel: CoordI) -> f64 {
        crate::layout::surface::surface_pixel(self, pixel)
    }

    /// Resample `pic` (a picture in this layout) into `dest`'s representation.
    fn to_layout<D: LayoutView + ?Sized>(&self, pic: &Picture, dest: &D) -> Picture {
        crate::layout::remap::remap(self, pic, dest)
    }

    /// Resample `pic` (a picture in `original`'s layout) into this layout's representation.
    fn from_layout<O: LayoutView + ?Sized>(&self, pic: &Picture, original: &O) -> Picture {
        original.to_layout(pic, self)
    }
}

impl<T: LayoutView + ?Sized> LayoutViewExt for T {}
