use crate::geometry::coord::CoordI;
use crate::layout::view::LayoutView;

/// Sphere area covered by the quad spanned by `pixel` and its right/bottom neighbors.
///
/// Neighbors that fall on another facet are clamped onto the edge of `pixel`'s facet: the
/// normalized coordinate becomes 1 on each axis that crossed. A clamped diagonal neighbor takes
/// `pixel`'s own row when only the horizontal step crossed, so right-edge pixels collapse onto
/// the `v10` corner. The quad is approximated by two planar triangles; a NaN area (no surface)
/// counts as 0.
pub(crate) fn surface_pixel<L: LayoutView + ?Sized>(layout: &L, pixel: CoordI) -> f64 {
    let n00 = layout.from_2d_to_normalized_face_info(pixel);
    let mut n10 = layout.from_2d_to_normalized_face_info(CoordI::new(pixel.x + 1, pixel.y));
    let mut n01 = layout.from_2d_to_normalized_face_info(CoordI::new(pixel.x, pixel.y + 1));
    let mut n11 = layout.from_2d_to_normalized_face_info(CoordI::new(pixel.x + 1, pixel.y + 1));

    let ok10 = n10.face_id == n00.face_id;
    let ok01 = n01.face_id == n00.face_id;
    if !ok10 {
        n10.face_id = n00.face_id;
        n10.coord.x = 1.0;
        n10.coord.y = n00.coord.y;
    }
    if !ok01 {
        n01.face_id = n00.face_id;
        n01.coord.x = n00.coord.x;
        n01.coord.y = 1.0;
    }
    if n11.face_id != n00.face_id {
        n11.face_id = n00.face_id;
        if !ok10 {
            n11.coord.x = 1.0;
        }
        n11.coord.y = if ok01 { n00.coord.y } else { 1.0 };
    }

    let v00 = layout.from_normalized_info_to_3d(n00);
    let v10 = layout.from_normalized_info_to_3d(n10);
    let v01 = layout.from_normalized_info_to_3d(n01);
    let v11 = layout.from_normalized_info_to_3d(n11);

    let area =
        (v10 - v00).cross(v11 - v00).norm() / 2.0 + (v01 - v00).cross(v11 - v00).norm() / 2.0;
    if area.is_nan() { 0.0 } else { area }
}
