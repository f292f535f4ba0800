use rayon::prelude::*;

use crate::foundation::math::in_interval;
use crate::geometry::coord::{Coord3dSpherical, CoordI};
use crate::layout::view::{LayoutView, LayoutViewExt};
use crate::picture::buffer::{CHANNELS, Picture};

/// Resample `pic`, laid out by `source`, into a fresh picture laid out by `dest`.
///
/// Each destination pixel is sent to the sphere by `dest` and brought back into `pic` by
/// `source`, then sampled with `source`'s interpolation. Pixels with no sphere point, or whose
/// sphere point lands outside `pic`, stay black. Rows are processed in parallel.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(from = source.kind(), to = dest.kind(), w = dest.width(), h = dest.height())
)]
pub(crate) fn remap<S, D>(source: &S, pic: &Picture, dest: &D) -> Picture
where
    S: LayoutView + ?Sized,
    D: LayoutView + ?Sized,
{
    let mut out = Picture::new(dest.width(), dest.height());
    let row_len = dest.width() as usize * CHANNELS;
    if row_len == 0 || pic.width() == 0 || pic.height() == 0 {
        return out;
    }
    let interp = source.interpolation();
    let (src_w, src_h) = (f64::from(pic.width()), f64::from(pic.height()));

    out.as_raw_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(j, row)| {
            for (i, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let p3d = dest.from_2d_to_3d(CoordI::new(i as i32, j as i32));
                if p3d.is_degenerate() {
                    continue;
                }
                let c = source.from_sphere_to_2d(Coord3dSpherical::from(p3d));
                if in_interval(c.x, 0.0, src_w) && in_interval(c.y, 0.0, src_h) {
                    px.copy_from_slice(&pic.get_inter_pixel(c, interp));
                }
            }
        });
    out
}
