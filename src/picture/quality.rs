//! Reference-based quality metrics on planar pictures.
//!
//! All metrics take `self` as the reference and `other` as the candidate; every metric is
//! symmetric in its two pictures.

use crate::foundation::error::LayoutResult;
use crate::picture::buffer::{CHANNELS, Picture};

/// Value reported by PSNR-style metrics when the pictures are identical (infinite PSNR).
///
/// Per-channel PSNR values are also capped at this value.
pub const PSNR_IDENTICAL_DB: f64 = 100.0;

const PEAK: f64 = 255.0;
const SSIM_C1: f64 = (0.01 * PEAK) * (0.01 * PEAK);
const SSIM_C2: f64 = (0.03 * PEAK) * (0.03 * PEAK);
const SSIM_SIGMA: f64 = 1.5;
const SSIM_RADIUS: usize = 5;
const MS_SSIM_WEIGHTS: [f64; 5] = [0.0448, 0.2856, 0.3001, 0.2363, 0.1333];

/// PSNR (dB) for one channel from its mean squared error.
pub(crate) fn psnr_from_mse(mse: f64) -> f64 {
    if mse <= 0.0 {
        return PSNR_IDENTICAL_DB;
    }
    (10.0 * (PEAK * PEAK / mse).log10()).min(PSNR_IDENTICAL_DB)
}

/// Average of per-channel PSNR values.
pub(crate) fn psnr_from_channel_mse(mse: [f64; CHANNELS]) -> f64 {
    mse.iter().map(|&m| psnr_from_mse(m)).sum::<f64>() / CHANNELS as f64
}

impl Picture {
    /// Peak signal-to-noise ratio in dB, averaged over the color channels.
    ///
    /// Returns [`PSNR_IDENTICAL_DB`] for identical pictures.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn psnr(&self, other: &Picture) -> LayoutResult<f64> {
        self.ensure_same_size(other, "PSNR")?;
        let mut sse = [0.0f64; CHANNELS];
        for (a, b) in self
            .as_raw()
            .chunks_exact(CHANNELS)
            .zip(other.as_raw().chunks_exact(CHANNELS))
        {
            for c in 0..CHANNELS {
                let d = f64::from(a[c]) - f64::from(b[c]);
                sse[c] += d * d;
            }
        }
        let n = f64::from(self.width()) * f64::from(self.height());
        Ok(psnr_from_channel_mse(sse.map(|s| s / n)))
    }

    /// Mean structural similarity over Gaussian windows (11x11, sigma 1.5), averaged over channels.
    ///
    /// Pictures smaller than the window use the largest window that fits.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn ssim(&self, other: &Picture) -> LayoutResult<f64> {
        self.ensure_same_size(other, "SSIM")?;
        let mut total = 0.0;
        for c in 0..CHANNELS {
            let a = Plane::from_channel(self, c);
            let b = Plane::from_channel(other, c);
            total += ssim_plane(&a, &b).ssim;
        }
        Ok(total / CHANNELS as f64)
    }

    /// Multi-scale SSIM over up to five dyadic scales.
    ///
    /// Scales that would shrink the picture below one pixel are dropped and the remaining
    /// exponents renormalized.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn ms_ssim(&self, other: &Picture) -> LayoutResult<f64> {
        self.ensure_same_size(other, "MS-SSIM")?;
        let min_side = self.width().min(self.height());
        let levels = (1 + min_side.ilog2() as usize).min(MS_SSIM_WEIGHTS.len());
        let weights = &MS_SSIM_WEIGHTS[..levels];
        let weight_sum: f64 = weights.iter().sum();

        let mut total = 0.0;
        for c in 0..CHANNELS {
            let mut a = Plane::from_channel(self, c);
            let mut b = Plane::from_channel(other, c);
            let mut score = 1.0;
            for (level, w) in weights.iter().enumerate() {
                let s = ssim_plane(&a, &b);
                let w = w / weight_sum;
                if level + 1 == levels {
                    score *= s.ssim.max(0.0).powf(w);
                } else {
                    score *= s.cs.max(0.0).powf(w);
                    a = a.downsample();
                    b = b.downsample();
                }
            }
            total += score;
        }
        Ok(total / CHANNELS as f64)
    }
}

/// One color channel as `f64` samples.
#[derive(Clone, Debug)]
struct Plane {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Plane {
    fn from_channel(pic: &Picture, c: usize) -> Self {
        Self {
            width: pic.width() as usize,
            height: pic.height() as usize,
            data: pic
                .as_raw()
                .chunks_exact(CHANNELS)
                .map(|p| f64::from(p[c]))
                .collect(),
        }
    }

    fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// 2x2 box average; an odd trailing row/column is dropped.
    fn downsample(&self) -> Self {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let x1 = (2 * x + 1).min(self.width - 1);
                let y1 = (2 * y + 1).min(self.height - 1);
                let s = self.at(2 * x, 2 * y)
                    + self.at(x1, 2 * y)
                    + self.at(2 * x, y1)
                    + self.at(x1, y1);
                data.push(s / 4.0);
            }
        }
        Self {
            width,
            height,
            data,
        }
    }
}

struct SsimScore {
    ssim: f64,
    cs: f64,
}

fn gaussian_window(radius: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-(d * d) / (2.0 * SSIM_SIGMA * SSIM_SIGMA)).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|v| v / sum).collect()
}

/// Separable "valid" filtering: output is `(w - 2r) x (h - 2r)`.
fn filter_valid(data: &[f64], width: usize, height: usize, k: &[f64]) -> Vec<f64> {
    let n = k.len();
    let out_w = width + 1 - n;
    let out_h = height + 1 - n;
    let mut horiz = vec![0.0; out_w * height];
    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        for x in 0..out_w {
            horiz[y * out_w + x] = k.iter().zip(&row[x..x + n]).map(|(w, v)| w * v).sum();
        }
    }
    let mut out = vec![0.0; out_w * out_h];
    for y in 0..out_h {
        for x in 0..out_w {
            out[y * out_w + x] = k
                .iter()
                .enumerate()
                .map(|(i, w)| w * horiz[(y + i) * out_w + x])
                .sum();
        }
    }
    out
}

fn ssim_plane(a: &Plane, b: &Plane) -> SsimScore {
    let radius = SSIM_RADIUS.min((a.width.min(a.height) - 1) / 2);
    let k = gaussian_window(radius);
    let (w, h) = (a.width, a.height);

    let aa: Vec<f64> = a.data.iter().map(|v| v * v).collect();
    let bb: Vec<f64> = b.data.iter().map(|v| v * v).collect();
    let ab: Vec<f64> = a.data.iter().zip(&b.data).map(|(x, y)| x * y).collect();

    let mu_a = filter_valid(&a.data, w, h, &k);
    let mu_b = filter_valid(&b.data, w, h, &k);
    let e_aa = filter_valid(&aa, w, h, &k);
    let e_bb = filter_valid(&bb, w, h, &k);
    let e_ab = filter_valid(&ab, w, h, &k);

    let mut ssim_sum = 0.0;
    let mut cs_sum = 0.0;
    for i in 0..mu_a.len() {
        let (ma, mb) = (mu_a[i], mu_b[i]);
        let var_a = e_aa[i] - ma * ma;
        let var_b = e_bb[i] - mb * mb;
        let cov = e_ab[i] - ma * mb;
        let cs = (2.0 * cov + SSIM_C2) / (var_a + var_b + SSIM_C2);
        let luminance = (2.0 * ma * mb + SSIM_C1) / (ma * ma + mb * mb + SSIM_C1);
        ssim_sum += luminance * cs;
        cs_sum += cs;
    }
    let n = mu_a.len() as f64;
    SsimScore {
        ssim: ssim_sum / n,
        cs: cs_sum / n,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/quality.rs"]
mod tests;
