use crate::foundation::error::{LayoutError, LayoutResult};

/// Absolute 0-based frame index in input-video order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> LayoutResult<Self> {
        if den == 0 {
            return Err(LayoutError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LayoutError::validation("Fps num must be > 0"));
        }
        let g = gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Approximate a floating-point frame rate (e.g. `29.97`) with millisecond precision.
    pub fn from_f64(fps: f64) -> LayoutResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(LayoutError::validation(format!(
                "fps must be a positive finite number, got {fps}"
            )));
        }
        let num = (fps * 1000.0).round();
        if num < 1.0 || num > f64::from(u32::MAX) {
            return Err(LayoutError::validation(format!("fps {fps} is out of range")));
        }
        Self::new(num as u32, 1000)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Divide the frame rate by an integer step (used when only every n-th frame is kept).
    pub fn divided_by(self, step: u32) -> LayoutResult<Self> {
        let den = self
            .den
            .checked_mul(step.max(1))
            .ok_or_else(|| LayoutError::validation("fps denominator overflow"))?;
        Self::new(self.num, den)
    }
}

/// Width/height pair of a planar representation, in pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Resolution {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl Resolution {
    /// Build a resolution.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale both sides by `factor`, rounding to the nearest pixel.
    pub fn scaled(self, factor: f64) -> LayoutResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(LayoutError::validation(format!(
                "resolution scale must be a positive finite number, got {factor}"
            )));
        }
        let w = (f64::from(self.width) * factor).round();
        let h = (f64::from(self.height) * factor).round();
        if w < 1.0 || h < 1.0 || w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(LayoutError::validation(format!(
                "{}x{} scaled by {factor} is not a usable resolution",
                self.width, self.height
            )));
        }
        Ok(Self::new(w as u32, h as u32))
    }

    /// Number of pixels.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
