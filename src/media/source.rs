use std::collections::VecDeque;

use crate::foundation::core::Resolution;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::picture::buffer::Picture;

/// Source contract for decoded input pictures.
///
/// Pictures are yielded in presentation order; `Ok(None)` marks the end of the stream.
pub trait FrameSource: Send {
    /// Size of every yielded picture.
    fn resolution(&self) -> Resolution;

    /// Next picture, or `None` once exhausted.
    fn next_picture(&mut self) -> LayoutResult<Option<Picture>>;
}

/// In-memory source for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySource {
    resolution: Resolution,
    frames: VecDeque<Picture>,
}

impl InMemorySource {
    /// Source yielding `frames` in order. All frames must share one size.
    pub fn new(frames: Vec<Picture>) -> LayoutResult<Self> {
        let resolution = frames
            .first()
            .map(|p| Resolution::new(p.width(), p.height()))
            .unwrap_or_default();
        if let Some(bad) = frames
            .iter()
            .find(|p| p.width() != resolution.width || p.height() != resolution.height)
        {
            return Err(LayoutError::media(format!(
                "in-memory source frames differ in size: {}x{} vs {}x{}",
                bad.width(),
                bad.height(),
                resolution.width,
                resolution.height
            )));
        }
        Ok(Self {
            resolution,
            frames: frames.into(),
        })
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn next_picture(&mut self) -> LayoutResult<Option<Picture>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/source.rs"]
mod tests;
