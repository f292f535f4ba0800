use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{LayoutError, LayoutResult};
use crate::layout::view::LayoutView;
use crate::picture::buffer::Picture;
use crate::picture::interpolate::Interpolation;

/// A reference-based picture quality metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityMetric {
    /// Multi-scale structural similarity.
    MsSsim,
    /// Structural similarity.
    Ssim,
    /// Peak signal-to-noise ratio.
    Psnr,
    /// Spherical PSNR with nearest-neighbor sampling.
    SPsnrNn,
    /// Spherical PSNR with interpolated (bicubic) sampling.
    SPsnrI,
    /// Weighted-spherical PSNR.
    WsPsnr,
}

impl QualityMetric {
    /// Every metric, in report column order.
    pub const ALL: [QualityMetric; 6] = [
        Self::MsSsim,
        Self::Ssim,
        Self::Psnr,
        Self::SPsnrNn,
        Self::SPsnrI,
        Self::WsPsnr,
    ];

    /// Name used in configuration files and reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::MsSsim => "MS-SSIM",
            Self::Ssim => "SSIM",
            Self::Psnr => "PSNR",
            Self::SPsnrNn => "S-PSNR-NN",
            Self::SPsnrI => "S-PSNR-I",
            Self::WsPsnr => "WS-PSNR",
        }
    }

    /// `true` for metrics that need the pictures' layouts.
    pub fn is_spherical(self) -> bool {
        matches!(self, Self::SPsnrNn | Self::SPsnrI | Self::WsPsnr)
    }

    /// Score `candidate` (laid out by `candidate_layout`) against `reference`.
    pub fn evaluate<R, C>(
        self,
        reference: &Picture,
        reference_layout: &R,
        candidate: &Picture,
        candidate_layout: &C,
    ) -> LayoutResult<f64>
    where
        R: LayoutView + ?Sized,
        C: LayoutView + ?Sized,
    {
        match self {
            Self::MsSsim => reference.ms_ssim(candidate),
            Self::Ssim => reference.ssim(candidate),
            Self::Psnr => reference.psnr(candidate),
            Self::SPsnrNn => reference.s_psnr(
                candidate,
                reference_layout,
                candidate_layout,
                Interpolation::NearestNeighbor,
            ),
            Self::SPsnrI => reference.s_psnr(
                candidate,
                reference_layout,
                candidate_layout,
                Interpolation::Bicubic,
            ),
            Self::WsPsnr => reference.ws_psnr(candidate, reference_layout, candidate_layout),
        }
    }
}

impl fmt::Display for QualityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityMetric {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s.trim())
            .ok_or_else(|| {
                LayoutError::config(format!(
                    "unknown quality metric '{s}' (expected one of MS-SSIM, SSIM, PSNR, S-PSNR-NN, S-PSNR-I, WS-PSNR)"
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/metric.rs"]
mod tests;
