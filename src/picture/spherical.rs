//! Sphere-aware PSNR variants.
//!
//! S-PSNR compares two pictures only at a fixed, nearly uniform set of points on the sphere,
//! each located in both pictures through their layouts. WS-PSNR weights every pixel's squared
//! error by the sphere area the pixel covers.

use std::f64::consts::{PI, TAU};
use std::sync::OnceLock;

use rayon::prelude::*;

use crate::foundation::error::{LayoutError, LayoutResult};
use crate::foundation::math::in_interval;
use crate::geometry::coord::{Coord3dSpherical, CoordF, CoordI};
use crate::layout::view::{LayoutView, LayoutViewExt};
use crate::picture::buffer::{CHANNELS, Picture};
use crate::picture::interpolate::Interpolation;
use crate::picture::quality::psnr_from_channel_mse;

/// Number of sphere points used by S-PSNR.
pub const SPHERE_SAMPLE_COUNT: usize = 655_362;

const CHUNK: usize = 4096;

/// `n` points spread evenly over the unit sphere along a Fibonacci spiral.
pub fn fibonacci_sphere(n: usize) -> Vec<Coord3dSpherical> {
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    (0..n)
        .map(|i| {
            let z = 1.0 - (2.0 * i as f64 + 1.0) / n as f64;
            let phi = z.clamp(-1.0, 1.0).acos();
            let theta = (i as f64 * golden_angle).rem_euclid(TAU) - PI;
            Coord3dSpherical::on_unit_sphere(theta, phi)
        })
        .collect()
}

fn sphere_samples() -> &'static [Coord3dSpherical] {
    static SAMPLES: OnceLock<Vec<Coord3dSpherical>> = OnceLock::new();
    SAMPLES.get_or_init(|| fibonacci_sphere(SPHERE_SAMPLE_COUNT))
}

fn inside(pic: &Picture, c: CoordF) -> bool {
    in_interval(c.x, 0.0, f64::from(pic.width())) && in_interval(c.y, 0.0, f64::from(pic.height()))
}

#[derive(Clone, Copy, Default)]
struct ErrorSum {
    sse: [f64; CHANNELS],
    weight: f64,
}

impl ErrorSum {
    fn add(&mut self, a: [u8; CHANNELS], b: [u8; CHANNELS], w: f64) {
        for c in 0..CHANNELS {
            let d = f64::from(a[c]) - f64::from(b[c]);
            self.sse[c] += w * d * d;
        }
        self.weight += w;
    }

    fn merge(mut self, o: Self) -> Self {
        for c in 0..CHANNELS {
            self.sse[c] += o.sse[c];
        }
        self.weight += o.weight;
        self
    }

    fn psnr(self, what: &str) -> LayoutResult<f64> {
        if self.weight <= 0.0 || !self.weight.is_finite() {
            return Err(LayoutError::metric(format!(
                "{what}: no sphere area is covered by both pictures"
            )));
        }
        Ok(psnr_from_channel_mse(self.sse.map(|s| s / self.weight)))
    }
}

impl Picture {
    /// Spherical PSNR against `other` over [`SPHERE_SAMPLE_COUNT`] sphere points.
    ///
    /// `layout` and `other_layout` describe how `self` and `other` cover the sphere. Points
    /// that land outside either picture are skipped. Both pictures are sampled with `interp`.
    #[tracing::instrument(level = "debug", skip_all, fields(interp = ?interp))]
    pub fn s_psnr<A, B>(
        &self,
        other: &Picture,
        layout: &A,
        other_layout: &B,
        interp: Interpolation,
    ) -> LayoutResult<f64>
    where
        A: LayoutView + ?Sized,
        B: LayoutView + ?Sized,
    {
        self.s_psnr_over(sphere_samples(), other, layout, other_layout, interp)
    }

    pub(crate) fn s_psnr_over<A, B>(
        &self,
        samples: &[Coord3dSpherical],
        other: &Picture,
        layout: &A,
        other_layout: &B,
        interp: Interpolation,
    ) -> LayoutResult<f64>
    where
        A: LayoutView + ?Sized,
        B: LayoutView + ?Sized,
    {
        // Chunk sums are merged in order so the result does not depend on scheduling.
        let partial: Vec<ErrorSum> = samples
            .par_chunks(CHUNK)
            .map(|chunk| {
                let mut acc = ErrorSum::default();
                for &s in chunk {
                    let ca = layout.from_sphere_to_2d(s);
                    let cb = other_layout.from_sphere_to_2d(s);
                    if inside(self, ca) && inside(other, cb) {
                        acc.add(
                            self.get_inter_pixel(ca, interp),
                            other.get_inter_pixel(cb, interp),
                            1.0,
                        );
                    }
                }
                acc
            })
            .collect();
        partial
            .into_iter()
            .fold(ErrorSum::default(), ErrorSum::merge)
            .psnr("S-PSNR")
    }

    /// Weighted-spherical PSNR against `other` (same size).
    ///
    /// Each pixel's squared error is weighted by the mean of the sphere areas it covers in
    /// `layout` and in `other_layout`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn ws_psnr<A, B>(&self, other: &Picture, layout: &A, other_layout: &B) -> LayoutResult<f64>
    where
        A: LayoutView + ?Sized,
        B: LayoutView + ?Sized,
    {
        self.ensure_same_size(other, "WS-PSNR")?;
        let (w, h) = (self.width() as i32, self.height() as i32);
        let rows: Vec<ErrorSum> = (0..h)
            .into_par_iter()
            .map(|y| {
                let mut acc = ErrorSum::default();
                for x in 0..w {
                    let p = CoordI::new(x, y);
                    let weight =
                        (layout.get_surface_pixel(p) + other_layout.get_surface_pixel(p)) / 2.0;
                    acc.add(self.get(p), other.get(p), weight);
                }
                acc
            })
            .collect();
        rows.into_iter()
            .fold(ErrorSum::default(), ErrorSum::merge)
            .psnr("WS-PSNR")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/spherical.rs"]
mod tests;
