use std::sync::{Arc, Mutex, PoisonError};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::LayoutResult;
use crate::picture::buffer::Picture;

/// Encoder used when none is configured.
pub const DEFAULT_CODEC: &str = "libx265";

/// Configuration provided to a [`FrameSink`] before the first picture.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Encoder name (`libx265`, `libx264`, ...).
    pub codec: String,
    /// Distance between key frames, in frames.
    pub gop_size: u32,
    /// Target bit rate in bit/s. `0` lets the encoder choose; a negative value asks for
    /// lossless coding where the encoder supports it.
    pub bit_rate: i64,
}

impl SinkConfig {
    /// Configuration for a `width x height` stream with encoder defaults.
    pub fn new(width: u32, height: u32, fps: Fps) -> Self {
        Self {
            width,
            height,
            fps,
            codec: DEFAULT_CODEC.to_owned(),
            gop_size: 1,
            bit_rate: 0,
        }
    }
}

/// Sink contract for output pictures.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order.
pub trait FrameSink: Send {
    /// Called once before any picture is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LayoutResult<()>;
    /// Push one picture.
    fn push_frame(&mut self, idx: FrameIndex, picture: &Picture) -> LayoutResult<()>;
    /// Called once after the last picture.
    fn end(&mut self) -> LayoutResult<()>;
}

/// Pictures captured by an [`InMemorySink`], readable after the sink was moved away.
#[derive(Clone, Debug, Default)]
pub struct CapturedFrames {
    inner: Arc<Mutex<Captured>>,
}

#[derive(Debug, Default)]
struct Captured {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Picture)>,
    ended: bool,
}

impl CapturedFrames {
    fn with<R>(&self, f: impl FnOnce(&mut Captured) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Configuration received in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.with(|c| c.cfg.clone())
    }

    /// Copy of the captured pictures, in push order.
    pub fn frames(&self) -> Vec<(FrameIndex, Picture)> {
        self.with(|c| c.frames.clone())
    }

    /// Number of captured pictures.
    pub fn len(&self) -> usize {
        self.with(|c| c.frames.len())
    }

    /// `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` once `end` was called.
    pub fn ended(&self) -> bool {
        self.with(|c| c.ended)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    captured: CapturedFrames,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the captured pictures.
    pub fn captured(&self) -> CapturedFrames {
        self.captured.clone()
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LayoutResult<()> {
        self.captured.with(|c| {
            c.cfg = Some(cfg);
            c.frames.clear();
            c.ended = false;
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, picture: &Picture) -> LayoutResult<()> {
        self.captured
            .with(|c| c.frames.push((idx, picture.clone())));
        Ok(())
    }

    fn end(&mut self) -> LayoutResult<()> {
        self.captured.with(|c| c.ended = true);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/sink.rs"]
mod tests;
