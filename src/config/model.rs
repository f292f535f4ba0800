//! JSON configuration document.
//!
//! The document has three top-level maps: `global` (run parameters and flows), `layouts`
//! (named layout sections) and `decorators` (named decorator sections referenced by layouts).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::foundation::error::{LayoutError, LayoutResult};
use crate::geometry::quaternion::Quaternion;
use crate::media::sink::DEFAULT_CODEC;
use crate::picture::interpolate::Interpolation;
use crate::picture::metric::QualityMetric;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Whole configuration document.
pub struct ConfigDocument {
    /// Run parameters.
    pub global: GlobalConfig,
    /// Layout sections by name.
    #[serde(default)]
    pub layouts: BTreeMap<String, LayoutConfig>,
    /// Decorator sections by name.
    #[serde(default)]
    pub decorators: BTreeMap<String, DecoratorConfig>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// The `global` section.
pub struct GlobalConfig {
    /// Flows as `[inputVideo, section, section, ...]`.
    pub layout_flow: Vec<Vec<String>>,
    /// Metric names measured for every flow but the first.
    #[serde(default)]
    pub quality_to_compute_list: Vec<String>,
    /// Output video name; empty disables video output.
    #[serde(default)]
    pub video_output_name: String,
    /// Encoder name; absent or empty means `libx265`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_output_codec: Option<String>,
    /// Output bitrate in kbit/s.
    #[serde(default)]
    pub video_output_bit_rate: i64,
    /// Process every n-th frame.
    #[serde(default = "default_processing_step")]
    pub processing_step: i64,
    /// Quality report name; empty disables quality reports.
    #[serde(default)]
    pub quality_output_name: String,
    /// Frames to process after `start_frame`.
    pub nb_frames: u64,
    /// Frames read and skipped before processing starts.
    #[serde(default)]
    pub start_frame: u64,
    /// Input frame rate.
    pub fps: f64,
    /// Sampling technique name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<String>,
    /// Accepted for compatibility; no display is opened.
    #[serde(default)]
    pub display_final_pict: bool,
    /// Worker thread count; `None` uses rayon defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

fn default_processing_step() -> i64 {
    1
}

/// One flow: an input video followed by the layout sections it goes through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowSpec {
    /// Input video path, as written in the document.
    pub input: String,
    /// Layout section names, head first.
    pub sections: Vec<String>,
}

impl GlobalConfig {
    /// Flows that name at least one layout section.
    pub fn flows(&self) -> Vec<FlowSpec> {
        self.layout_flow
            .iter()
            .filter_map(|flow| {
                let (input, sections) = flow.split_first()?;
                (!sections.is_empty()).then(|| FlowSpec {
                    input: input.clone(),
                    sections: sections.to_vec(),
                })
            })
            .collect()
    }

    /// Requested metrics in report column order.
    pub fn quality_metrics(&self) -> LayoutResult<Vec<QualityMetric>> {
        let set = self
            .quality_to_compute_list
            .iter()
            .map(|name| name.parse::<QualityMetric>())
            .collect::<LayoutResult<BTreeSet<_>>>()?;
        Ok(set.into_iter().collect())
    }

    /// Encoder name.
    pub fn codec(&self) -> &str {
        match self.video_output_codec.as_deref() {
            Some(codec) if !codec.trim().is_empty() => codec.trim(),
            _ => DEFAULT_CODEC,
        }
    }

    /// Output bitrate in bit/s.
    pub fn bit_rate_bps(&self) -> i64 {
        self.video_output_bit_rate.saturating_mul(1000)
    }

    /// Processing step, at least 1.
    pub fn step(&self) -> u32 {
        self.processing_step.clamp(1, i64::from(u32::MAX)) as u32
    }

    /// Sampling technique. Unknown names fall back to bilinear.
    pub fn interpolation(&self) -> Interpolation {
        match self.interpolation.as_deref() {
            None => Interpolation::default(),
            Some(name) if name.trim().is_empty() => Interpolation::default(),
            Some(name) => Interpolation::from_name(name).unwrap_or_else(|| {
                tracing::warn!(interpolation = name, "unknown interpolation, using BILINEAR");
                Interpolation::Bilinear
            }),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A layout section.
pub struct LayoutConfig {
    /// Layout variant and its size parameters.
    #[serde(flatten)]
    pub kind: LayoutKindConfig,
    /// Fixed viewing orientation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationConfig>,
    /// Orientation trace file; overrides `rotation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_trace: Option<String>,
    /// Decorator section names, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    /// Output bitrate override in kbit/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<i64>,
    /// Size as a factor of the previous layout's reference resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_resolution: Option<f64>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
/// Layout variants. Sizes may be omitted when `relativeResolution` is set.
pub enum LayoutKindConfig {
    /// Flat rectilinear view.
    FlatFixed {
        /// Width in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        /// Height in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
        /// Horizontal field of view in degrees.
        horizontal_angle_of_vision: f64,
        /// Vertical field of view in degrees.
        vertical_angle_of_vision: f64,
    },
    /// Full-sphere equirectangular picture.
    Equirectangular {
        /// Width in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        /// Height in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    /// Six cube faces in a 3x2 grid.
    CubeMap {
        /// Face edge in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edge: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A fixed rotation, either as a quaternion or as yaw/pitch/roll in degrees.
pub enum RotationConfig {
    /// Quaternion components (normalized on use).
    Quaternion {
        /// Scalar part.
        w: f64,
        /// `i` part.
        x: f64,
        /// `j` part.
        y: f64,
        /// `k` part.
        z: f64,
    },
    /// Euler angles in degrees.
    Euler {
        /// Turn from +X toward +Y.
        #[serde(default)]
        yaw: f64,
        /// Raise toward +Z.
        #[serde(default)]
        pitch: f64,
        /// Spin around the view center.
        #[serde(default)]
        roll: f64,
    },
}

impl RotationConfig {
    /// Unit quaternion for this rotation.
    pub fn to_quaternion(self) -> LayoutResult<Quaternion> {
        match self {
            Self::Quaternion { w, x, y, z } => {
                let q = Quaternion::new(w, x, y, z);
                let n = q.norm();
                if !n.is_finite() || n == 0.0 {
                    return Err(LayoutError::config(
                        "rotation quaternion must have a finite non-zero norm",
                    ));
                }
                Ok(q.normalized())
            }
            Self::Euler { yaw, pitch, roll } => {
                if ![yaw, pitch, roll].iter().all(|a| a.is_finite()) {
                    return Err(LayoutError::config("rotation angles must be finite"));
                }
                Ok(Quaternion::from_yaw_pitch_roll(
                    yaw.to_radians(),
                    pitch.to_radians(),
                    roll.to_radians(),
                ))
            }
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
/// A decorator section.
pub enum DecoratorConfig {
    /// Extra fixed rotation.
    Rotation {
        /// The rotation applied.
        rotation: RotationConfig,
    },
    /// Offset projection.
    Offset {
        /// Offset along X.
        #[serde(default)]
        x: f64,
        /// Offset along Y.
        #[serde(default)]
        y: f64,
        /// Offset along Z.
        #[serde(default)]
        z: f64,
    },
}

impl ConfigDocument {
    /// Parse a JSON document. Relative paths resolve against `base_dir`.
    pub fn from_json_str(json: &str, base_dir: impl Into<PathBuf>) -> LayoutResult<Self> {
        let mut doc: Self = serde_json::from_str(json)
            .map_err(|e| LayoutError::config(format!("invalid configuration: {e}")))?;
        doc.base_dir = base_dir.into();
        doc.validate()?;
        Ok(doc)
    }

    /// Read and parse the JSON document at `path`.
    pub fn load(path: &Path) -> LayoutResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read configuration '{}'", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json_str(&text, base_dir).map_err(|e| match e {
            LayoutError::Config(msg) | LayoutError::Validation(msg) => {
                LayoutError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Resolve a path written in the document.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    /// Layout section by name.
    pub fn layout(&self, name: &str) -> LayoutResult<&LayoutConfig> {
        self.layouts
            .get(name)
            .ok_or_else(|| LayoutError::config(format!("unknown layout section '{name}'")))
    }

    /// Decorator section by name.
    pub fn decorator(&self, name: &str) -> LayoutResult<&DecoratorConfig> {
        self.decorators
            .get(name)
            .ok_or_else(|| LayoutError::config(format!("unknown decorator section '{name}'")))
    }

    /// Check cross references and scalar ranges.
    pub fn validate(&self) -> LayoutResult<()> {
        let g = &self.global;
        if !g.fps.is_finite() || g.fps <= 0.0 {
            return Err(LayoutError::config(format!(
                "global.fps must be a positive number, got {}",
                g.fps
            )));
        }
        if let Some(0) = g.threads {
            return Err(LayoutError::config("global.threads must be >= 1 when set"));
        }
        g.quality_metrics()?;

        let flows = g.flows();
        if flows.is_empty() {
            return Err(LayoutError::config(
                "global.layoutFlow must contain a flow with at least one layout section",
            ));
        }
        for flow in &flows {
            for (i, name) in flow.sections.iter().enumerate() {
                let layout = self.layout(name)?;
                if i == 0 && layout.relative_resolution.is_some() {
                    return Err(LayoutError::config(format!(
                        "layout '{name}' heads a flow and cannot use relativeResolution"
                    )));
                }
            }
        }
        for (name, layout) in &self.layouts {
            if let Some(deco) = layout
                .decorators
                .iter()
                .find(|d| !self.decorators.contains_key(d.as_str()))
            {
                return Err(LayoutError::config(format!(
                    "layout '{name}' references unknown decorator section '{deco}'"
                )));
            }
            match layout.relative_resolution {
                Some(s) if !(s.is_finite() && s > 0.0) => {
                    return Err(LayoutError::config(format!(
                        "layout '{name}': relativeResolution must be > 0, got {s}"
                    )));
                }
                Some(_) => {}
                None => layout.kind.absolute_size_check(name)?,
            }
        }
        Ok(())
    }
}

impl LayoutKindConfig {
    fn absolute_size_check(&self, name: &str) -> LayoutResult<()> {
        let missing = match self {
            Self::FlatFixed { width, height, .. } | Self::Equirectangular { width, height } => {
                width.is_none() || height.is_none()
            }
            Self::CubeMap { edge } => edge.is_none(),
        };
        if missing {
            return Err(LayoutError::config(format!(
                "layout '{name}' needs its size or a relativeResolution"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
