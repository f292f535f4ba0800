//! Time-dependent viewing orientation of a layout.
//!
//! A [`DynamicPosition`] is either fixed (one quaternion for the whole video) or driven by a
//! [`PositionTrace`]: a list of timestamped orientations sampled by spherical linear
//! interpolation. The owning layout advances it between frames with
//! [`DynamicPosition::set_next_position`] and reads it during remapping with
//! [`DynamicPosition::get_next_position`].

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{LayoutError, LayoutResult};
use crate::geometry::quaternion::Quaternion;

/// One timestamped orientation of a trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSample {
    /// Seconds from the start of the video.
    pub timestamp: f64,
    /// Unit orientation at `timestamp`.
    pub orientation: Quaternion,
}

/// Strictly increasing sequence of [`PositionSample`]s (never empty).
#[derive(Clone, Debug, PartialEq)]
pub struct PositionTrace {
    samples: Vec<PositionSample>,
}

impl PositionTrace {
    /// Build a trace from samples; quaternions are normalized.
    pub fn new(samples: Vec<PositionSample>) -> LayoutResult<Self> {
        if samples.is_empty() {
            return Err(LayoutError::validation("position trace has no samples"));
        }
        for pair in samples.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(LayoutError::validation(format!(
                    "position trace timestamps must increase: {} then {}",
                    pair[0].timestamp, pair[1].timestamp
                )));
            }
        }
        let samples = samples
            .into_iter()
            .map(|s| PositionSample {
                timestamp: s.timestamp,
                orientation: s.orientation.normalized(),
            })
            .collect();
        Ok(Self { samples })
    }

    /// Parse the text format: one `timestamp w x y z` record per line.
    ///
    /// Fields may be separated by whitespace or commas. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> LayoutResult<Self> {
        let mut samples = Vec::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let fields = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|f| !f.is_empty())
                .map(str::parse::<f64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    LayoutError::validation(format!("position trace line {}: {e}", lineno + 1))
                })?;
            let [timestamp, w, x, y, z] = fields[..] else {
                return Err(LayoutError::validation(format!(
                    "position trace line {}: expected 5 fields (timestamp w x y z), got {}",
                    lineno + 1,
                    fields.len()
                )));
            };
            if fields.iter().any(|v| !v.is_finite()) {
                return Err(LayoutError::validation(format!(
                    "position trace line {}: non-finite value",
                    lineno + 1
                )));
            }
            samples.push(PositionSample {
                timestamp,
                orientation: Quaternion::new(w, x, y, z),
            });
        }
        Self::new(samples)
    }

    /// Read and parse a trace file.
    pub fn load(path: &Path) -> LayoutResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read position trace '{}'", path.display()))?;
        Self::parse(&text).map_err(|e| match e {
            LayoutError::Validation(msg) => {
                LayoutError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Samples in timestamp order.
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// Orientation at `t` seconds; the first/last sample is held outside the trace range.
    pub fn orientation_at(&self, t: f64) -> Quaternion {
        let next = self.samples.partition_point(|s| s.timestamp <= t);
        if next == 0 {
            return self.samples[0].orientation;
        }
        if next == self.samples.len() {
            return self.samples[next - 1].orientation;
        }
        let a = self.samples[next - 1];
        let b = self.samples[next];
        let frac = (t - a.timestamp) / (b.timestamp - a.timestamp);
        a.orientation.slerp(b.orientation, frac)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum PositionSource {
    Fixed,
    Trace(PositionTrace),
}

/// Current viewing orientation of a layout.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicPosition {
    source: PositionSource,
    current: Quaternion,
}

impl Default for DynamicPosition {
    fn default() -> Self {
        Self::fixed(Quaternion::identity())
    }
}

impl DynamicPosition {
    /// Orientation that never changes.
    pub fn fixed(orientation: Quaternion) -> Self {
        Self {
            source: PositionSource::Fixed,
            current: orientation.normalized(),
        }
    }

    /// Orientation following `trace`, starting at its value for `t = 0`.
    pub fn from_trace(trace: PositionTrace) -> Self {
        let current = trace.orientation_at(0.0);
        Self {
            source: PositionSource::Trace(trace),
            current,
        }
    }

    /// `true` when the orientation may change with time.
    pub fn is_dynamic(&self) -> bool {
        matches!(self.source, PositionSource::Trace(_))
    }

    /// Advance to the orientation at `relative_timestamp` seconds. No-op for fixed positions.
    pub fn set_next_position(&mut self, relative_timestamp: f64) {
        if let PositionSource::Trace(trace) = &self.source {
            self.current = trace.orientation_at(relative_timestamp);
        }
    }

    /// Current orientation.
    pub fn get_next_position(&self) -> Quaternion {
        self.current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orientation/dynamic_position.rs"]
mod tests;
