//! Layout decorators.
//!
//! A [`LayoutDecorator`] owns another layout and forwards the whole contract to it, letting a
//! [`DecoratorTransform`] rewrite coordinates on the way in and out. Wrapping decorators
//! composes their transforms: the outermost one acts last when going from the picture to the
//! sphere and first when going back.

use crate::foundation::core::Resolution;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::geometry::coord::{Coord3dCart, Coord3dSpherical, CoordF, CoordI};
use crate::geometry::quaternion::{Quaternion, rotation};
use crate::layout::view::{LayoutBase, LayoutView, NormalizedFaceInfo};

/// Coordinate rewrite hooks of a decorator. Every hook defaults to the identity.
///
/// `after_to_3d` and `before_from_3d` must be inverses of each other, as must
/// `after_from_2d` and `before_to_2d`.
pub trait DecoratorTransform: Send + Sync {
    /// Short human-readable kind.
    fn kind(&self) -> &'static str;

    /// Rewrite the facet info computed for a pixel.
    fn after_from_2d(&self, info: NormalizedFaceInfo) -> NormalizedFaceInfo {
        info
    }

    /// Rewrite facet info before it is turned into a pixel coordinate.
    fn before_to_2d(&self, info: NormalizedFaceInfo) -> NormalizedFaceInfo {
        info
    }

    /// Rewrite a sphere point before the wrapped layout maps it to a facet.
    fn before_from_3d(&self, point: Coord3dSpherical) -> Coord3dSpherical {
        point
    }

    /// Rewrite the sphere point produced by the wrapped layout.
    fn after_to_3d(&self, point: Coord3dCart) -> Coord3dCart {
        point
    }

    /// Reference resolution derived from the wrapped layout's.
    fn reference_resolution(&self, inner: Resolution) -> Resolution {
        inner
    }
}

/// A layout wrapped by a [`DecoratorTransform`].
pub struct LayoutDecorator<T> {
    inner: Box<dyn LayoutView>,
    transform: T,
}

impl<T: DecoratorTransform> LayoutDecorator<T> {
    /// Wrap `inner`.
    pub fn new(inner: Box<dyn LayoutView>, transform: T) -> Self {
        Self { inner, transform }
    }

    /// Wrapped layout.
    pub fn inner(&self) -> &dyn LayoutView {
        self.inner.as_ref()
    }

    /// Decorator hooks.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Unwrap into the wrapped layout.
    pub fn into_inner(self) -> Box<dyn LayoutView> {
        self.inner
    }
}

impl<T: DecoratorTransform> std::fmt::Debug for LayoutDecorator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutDecorator")
            .field("kind", &self.transform.kind())
            .field("inner", &self.inner.kind())
            .finish()
    }
}

impl<T: DecoratorTransform> LayoutView for LayoutDecorator<T> {
    fn kind(&self) -> &'static str {
        self.transform.kind()
    }

    fn base(&self) -> &LayoutBase {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut LayoutBase {
        self.inner.base_mut()
    }

    fn init(&mut self) -> LayoutResult<()> {
        self.inner.init()
    }

    fn next_step(&mut self, relative_timestamp: f64) {
        self.inner.next_step(relative_timestamp);
    }

    fn reference_resolution(&self) -> Resolution {
        self.transform
            .reference_resolution(self.inner.reference_resolution())
    }

    fn from_2d_to_normalized_face_info(&self, pixel: CoordI) -> NormalizedFaceInfo {
        self.transform
            .after_from_2d(self.inner.from_2d_to_normalized_face_info(pixel))
    }

    fn from_normalized_info_to_2d(&self, info: NormalizedFaceInfo) -> CoordF {
        self.inner
            .from_normalized_info_to_2d(self.transform.before_to_2d(info))
    }

    fn from_3d_to_normalized_face_info(&self, point: Coord3dSpherical) -> NormalizedFaceInfo {
        self.inner
            .from_3d_to_normalized_face_info(self.transform.before_from_3d(point))
    }

    fn from_normalized_info_to_3d(&self, info: NormalizedFaceInfo) -> Coord3dCart {
        self.transform
            .after_to_3d(self.inner.from_normalized_info_to_3d(info))
    }
}

/// Extra fixed rotation applied on top of the wrapped layout's own orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationTransform {
    rotation: Quaternion,
}

impl RotationTransform {
    /// Rotation by `q` (normalized).
    pub fn new(q: Quaternion) -> Self {
        Self {
            rotation: q.normalized(),
        }
    }

    /// The applied rotation.
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }
}

impl DecoratorTransform for RotationTransform {
    fn kind(&self) -> &'static str {
        "rotation"
    }

    fn before_from_3d(&self, point: Coord3dSpherical) -> Coord3dSpherical {
        rotation(point, self.rotation.inv())
    }

    fn after_to_3d(&self, point: Coord3dCart) -> Coord3dCart {
        self.rotation.rotate(point)
    }
}

/// Offset projection: the wrapped layout is seen from a point `offset` away from the sphere
/// center, which concentrates its pixels toward the offset direction.
///
/// `offset` must have norm < 1 so the viewpoint stays inside the sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetTransform {
    offset: Coord3dCart,
}

impl OffsetTransform {
    /// Offset projection from `offset`.
    pub fn new(offset: Coord3dCart) -> LayoutResult<Self> {
        let n = offset.norm();
        if !n.is_finite() || n >= 1.0 {
            return Err(LayoutError::validation(format!(
                "offset vector norm must be < 1, got {n}"
            )));
        }
        Ok(Self { offset })
    }

    /// The offset vector.
    pub fn offset(&self) -> Coord3dCart {
        self.offset
    }
}

impl DecoratorTransform for OffsetTransform {
    fn kind(&self) -> &'static str {
        "offset"
    }

    fn before_from_3d(&self, point: Coord3dSpherical) -> Coord3dSpherical {
        let s = Coord3dCart::from(point);
        if s.is_degenerate() {
            return point;
        }
        let s = s.normalized();
        let o = self.offset;
        let d = s.dot(o);
        let t = d + (d * d - o.dot(o) + 1.0).sqrt();
        Coord3dSpherical::from(s * t - o)
    }

    fn after_to_3d(&self, point: Coord3dCart) -> Coord3dCart {
        if point.is_degenerate() {
            return point;
        }
        (point.normalized() + self.offset).normalized()
    }
}

/// Layout with an extra rotation.
pub type RotationDecorator = LayoutDecorator<RotationTransform>;

/// Layout seen through an offset projection.
pub type OffsetDecorator = LayoutDecorator<OffsetTransform>;

#[cfg(test)]
#[path = "../../tests/unit/layout/decorator.rs"]
mod tests;
