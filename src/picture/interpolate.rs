use crate::foundation::math::saturate_u8;
use crate::geometry::coord::CoordF;
use crate::picture::buffer::{CHANNELS, Picture, Pixel};

/// Sub-pixel sampling technique.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// Closest lattice point.
    NearestNeighbor,
    /// Weighted 2x2 neighborhood.
    #[default]
    Bilinear,
    /// Weighted 4x4 neighborhood (Keys kernel, `a = -0.75`).
    Bicubic,
}

impl Interpolation {
    /// Parse a configuration name. Accepts the historical `NEAREST_NEIGHTBOOR` spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NEAREST_NEIGHTBOOR" | "NEAREST_NEIGHBOR" | "NEAREST" => Some(Self::NearestNeighbor),
            "BILINEAR" => Some(Self::Bilinear),
            "BICUBIC" => Some(Self::Bicubic),
            _ => None,
        }
    }
}

pub(crate) fn sample(pic: &Picture, coord: CoordF, interp: Interpolation) -> Pixel {
    match interp {
        Interpolation::NearestNeighbor => nearest(pic, coord),
        Interpolation::Bilinear => bilinear(pic, coord),
        Interpolation::Bicubic => bicubic(pic, coord),
    }
}

// Border pixels are replicated: the 2x2 and 4x4 neighborhoods of an in-bounds coordinate may
// reach one or two lattice points past the edge.
fn clamp_index(v: i64, len: u32) -> u32 {
    v.clamp(0, i64::from(len) - 1) as u32
}

fn texel(pic: &Picture, x: i64, y: i64) -> &[u8] {
    let x = clamp_index(x, pic.width()) as usize;
    let y = clamp_index(y, pic.height()) as usize;
    let off = (y * pic.width() as usize + x) * CHANNELS;
    &pic.as_raw()[off..off + CHANNELS]
}

fn nearest(pic: &Picture, coord: CoordF) -> Pixel {
    let t = texel(pic, coord.x.round() as i64, coord.y.round() as i64);
    [t[0], t[1], t[2]]
}

fn bilinear(pic: &Picture, coord: CoordF) -> Pixel {
    let x0 = coord.x.floor();
    let y0 = coord.y.floor();
    let fx = coord.x - x0;
    let fy = coord.y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = texel(pic, x0, y0);
    let p10 = texel(pic, x0 + 1, y0);
    let p01 = texel(pic, x0, y0 + 1);
    let p11 = texel(pic, x0 + 1, y0 + 1);

    let mut out = [0u8; CHANNELS];
    for (c, o) in out.iter_mut().enumerate() {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        *o = saturate_u8(top * (1.0 - fy) + bottom * fy);
    }
    out
}

const CUBIC_A: f64 = -0.75;

fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn cubic_weights(f: f64) -> [f64; 4] {
    [
        cubic_weight(1.0 + f),
        cubic_weight(f),
        cubic_weight(1.0 - f),
        cubic_weight(2.0 - f),
    ]
}

fn bicubic(pic: &Picture, coord: CoordF) -> Pixel {
    let x0 = coord.x.floor();
    let y0 = coord.y.floor();
    let wx = cubic_weights(coord.x - x0);
    let wy = cubic_weights(coord.y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = [0.0f64; CHANNELS];
    for (dy, wy) in (-1i64..=2).zip(wy) {
        for (dx, wx) in (-1i64..=2).zip(wx) {
            let p = texel(pic, x0 + dx, y0 + dy);
            let w = wx * wy;
            for c in 0..CHANNELS {
                acc[c] += f64::from(p[c]) * w;
            }
        }
    }
    acc.map(saturate_u8)
}

#[cfg(test)]
#[path = "../../tests/unit/picture/interpolate.rs"]
mod tests;
