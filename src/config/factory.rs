use crate::config::model::{ConfigDocument, DecoratorConfig, LayoutConfig, LayoutKindConfig};
use crate::foundation::core::Resolution;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::geometry::coord::Coord3dCart;
use crate::layout::cubemap::CubeMapLayout;
use crate::layout::decorator::{
    OffsetDecorator, OffsetTransform, RotationDecorator, RotationTransform,
};
use crate::layout::equirectangular::EquirectangularLayout;
use crate::layout::flat_fixed::FlatFixedLayout;
use crate::layout::view::LayoutView;
use crate::orientation::dynamic_position::{DynamicPosition, PositionTrace};
use crate::picture::interpolate::Interpolation;

/// Builds layouts (with their decorator chains) from the sections of a [`ConfigDocument`].
#[derive(Clone, Copy, Debug)]
pub struct LayoutFactory<'a> {
    doc: &'a ConfigDocument,
}

impl<'a> LayoutFactory<'a> {
    /// Factory over `doc`.
    pub fn new(doc: &'a ConfigDocument) -> Self {
        Self { doc }
    }

    /// Build, initialize and configure every layout of a flow, head first.
    ///
    /// Relative layouts size themselves from the reference resolution of the layout before them.
    pub fn build_flow(
        &self,
        sections: &[String],
        interpolation: Interpolation,
    ) -> LayoutResult<Vec<Box<dyn LayoutView>>> {
        let mut layouts: Vec<Box<dyn LayoutView>> = Vec::with_capacity(sections.len());
        for name in sections {
            let previous = layouts.last().map(|l| l.reference_resolution());
            let mut layout = self.build_layout(name, previous)?;
            layout.init()?;
            layout.set_interpolation(interpolation);
            tracing::debug!(
                section = %name,
                kind = layout.kind(),
                width = layout.width(),
                height = layout.height(),
                "layout built"
            );
            layouts.push(layout);
        }
        Ok(layouts)
    }

    /// Build the layout of section `name`, wrapped in its decorators.
    ///
    /// `previous` is the reference resolution of the preceding layout in the flow, required
    /// when the section uses `relativeResolution`.
    pub fn build_layout(
        &self,
        name: &str,
        previous: Option<Resolution>,
    ) -> LayoutResult<Box<dyn LayoutView>> {
        let cfg = self.doc.layout(name)?;
        let position = self.position(cfg)?;
        let reference = match cfg.relative_resolution {
            Some(scale) => {
                let prev = previous.ok_or_else(|| {
                    LayoutError::config(format!(
                        "layout '{name}' uses relativeResolution but has no preceding layout"
                    ))
                })?;
                Some(prev.scaled(scale).map_err(|e| in_section(name, e))?)
            }
            None => None,
        };

        let mut layout: Box<dyn LayoutView> = match cfg.kind {
            LayoutKindConfig::FlatFixed {
                width,
                height,
                horizontal_angle_of_vision,
                vertical_angle_of_vision,
            } => {
                let hfov = horizontal_angle_of_vision.to_radians();
                let vfov = vertical_angle_of_vision.to_radians();
                let (w, h) = match reference {
                    Some(r) => (r.width, r.height),
                    None => (required(name, width)?, required(name, height)?),
                };
                Box::new(
                    FlatFixedLayout::new(w, h, hfov, vfov, position)
                        .map_err(|e| in_section(name, e))?,
                )
            }
            LayoutKindConfig::Equirectangular { width, height } => {
                let (w, h) = match reference {
                    Some(r) => (r.width, r.height),
                    None => (required(name, width)?, required(name, height)?),
                };
                Box::new(
                    EquirectangularLayout::new(w, h, position).map_err(|e| in_section(name, e))?,
                )
            }
            LayoutKindConfig::CubeMap { edge } => {
                let e = match reference {
                    Some(r) => fraction_of(r.height, 0.5),
                    None => required(name, edge)?,
                };
                Box::new(CubeMapLayout::new(e, position).map_err(|e| in_section(name, e))?)
            }
        };

        // Build inside-out so the first listed decorator ends up outermost.
        for deco_name in cfg.decorators.iter().rev() {
            layout = match self.doc.decorator(deco_name)? {
                DecoratorConfig::Rotation { rotation } => Box::new(RotationDecorator::new(
                    layout,
                    RotationTransform::new(rotation.to_quaternion()?),
                )),
                DecoratorConfig::Offset { x, y, z } => {
                    let transform = OffsetTransform::new(Coord3dCart::new(*x, *y, *z))
                        .map_err(|e| in_section(deco_name, e))?;
                    Box::new(OffsetDecorator::new(layout, transform))
                }
            };
        }
        Ok(layout)
    }

    /// Output bitrate (bit/s) for a flow ending with section `name`.
    pub fn output_bit_rate(&self, name: &str) -> LayoutResult<i64> {
        let cfg = self.doc.layout(name)?;
        Ok(match cfg.bitrate {
            Some(kbps) => kbps.saturating_mul(1000),
            None => self.doc.global.bit_rate_bps(),
        })
    }

    fn position(&self, cfg: &LayoutConfig) -> LayoutResult<DynamicPosition> {
        if let Some(trace) = &cfg.position_trace {
            let trace = PositionTrace::load(&self.doc.resolve_path(trace))?;
            return Ok(DynamicPosition::from_trace(trace));
        }
        match cfg.rotation {
            Some(r) => Ok(DynamicPosition::fixed(r.to_quaternion()?)),
            None => Ok(DynamicPosition::default()),
        }
    }
}

fn required(section: &str, v: Option<u32>) -> LayoutResult<u32> {
    v.filter(|&v| v > 0).ok_or_else(|| {
        LayoutError::config(format!(
            "layout '{section}' needs a non-zero size or a relativeResolution"
        ))
    })
}

fn fraction_of(len: u32, fraction: f64) -> u32 {
    ((f64::from(len) * fraction).round() as u32).max(1)
}

fn in_section(section: &str, e: LayoutError) -> LayoutError {
    match e {
        LayoutError::Validation(msg) | LayoutError::Config(msg) => {
            LayoutError::config(format!("section '{section}': {msg}"))
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/factory.rs"]
mod tests;
