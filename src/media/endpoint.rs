use std::path::Path;

use crate::foundation::core::{FrameIndex, Resolution};
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::media::ffmpeg::{FfmpegSink, FfmpegSource};
use crate::media::image_seq::{ImageSequenceSink, ImageSequenceSource, is_image_file};
use crate::media::sink::{FrameSink, SinkConfig};
use crate::media::source::FrameSource;
use crate::picture::buffer::Picture;

/// Video input and output attached to one layout of a flow.
///
/// Initialization is first-wins: once an input (or output) is attached, later init calls
/// leave it untouched. Reading without an input yields `None`; writing without an output
/// does nothing.
#[derive(Default)]
pub struct LayoutEndpoint {
    input: Option<Box<dyn FrameSource>>,
    output: Option<Box<dyn FrameSink>>,
    written: u64,
}

impl std::fmt::Debug for LayoutEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEndpoint")
            .field("has_input", &self.input.is_some())
            .field("has_output", &self.output.is_some())
            .field("written", &self.written)
            .finish()
    }
}

impl LayoutEndpoint {
    /// Endpoint with neither input nor output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` as input, reading at most `frame_limit` pictures when set.
    ///
    /// Image files and directories are read as image sequences, anything else through ffmpeg.
    pub fn init_input_video(&mut self, path: &Path, frame_limit: Option<u64>) -> LayoutResult<()> {
        if self.input.is_some() {
            return Ok(());
        }
        let source: Box<dyn FrameSource> = if path.is_dir() || is_image_file(path) {
            Box::new(ImageSequenceSource::open(path, frame_limit)?)
        } else {
            Box::new(FfmpegSource::open(path, frame_limit)?)
        };
        tracing::info!(path = %path.display(), "input video opened");
        self.input = Some(source);
        Ok(())
    }

    /// Attach an already opened source.
    pub fn init_input_source(&mut self, source: Box<dyn FrameSource>) {
        if self.input.is_none() {
            self.input = Some(source);
        }
    }

    /// Create `path` as output. `.png` targets and directories become PNG sequences, anything
    /// else is encoded through ffmpeg.
    pub fn init_output_video(&mut self, path: &Path, cfg: SinkConfig) -> LayoutResult<()> {
        if self.output.is_some() {
            return Ok(());
        }
        let sink: Box<dyn FrameSink> =
            if path.is_dir() || is_image_file(path) || path.extension().is_none() {
                Box::new(ImageSequenceSink::new(path))
            } else {
                Box::new(FfmpegSink::create(path))
            };
        tracing::info!(
            path = %path.display(),
            codec = %cfg.codec,
            bit_rate = cfg.bit_rate,
            "output video created"
        );
        self.init_output_sink(sink, cfg)
    }

    /// Attach a sink and start it with `cfg`.
    pub fn init_output_sink(
        &mut self,
        mut sink: Box<dyn FrameSink>,
        cfg: SinkConfig,
    ) -> LayoutResult<()> {
        if self.output.is_some() {
            return Ok(());
        }
        sink.begin(cfg)?;
        self.output = Some(sink);
        self.written = 0;
        Ok(())
    }

    /// `true` once an input is attached.
    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// `true` once an output is attached.
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Size of the input pictures, when an input is attached.
    pub fn input_resolution(&self) -> Option<Resolution> {
        self.input.as_ref().map(|s| s.resolution())
    }

    /// Next input picture; `None` without an input or at the end of the stream.
    pub fn read_next_picture_from_video(&mut self) -> LayoutResult<Option<Picture>> {
        match self.input.as_mut() {
            Some(source) => source.next_picture(),
            None => Ok(None),
        }
    }

    /// Append `picture` to the output, if any.
    pub fn write_picture_to_video(&mut self, picture: &Picture) -> LayoutResult<()> {
        let Some(sink) = self.output.as_mut() else {
            return Ok(());
        };
        sink.push_frame(FrameIndex(self.written), picture)?;
        self.written += 1;
        Ok(())
    }

    /// Close the output and release the input.
    pub fn finish(&mut self) -> LayoutResult<()> {
        self.input = None;
        match self.output.take() {
            Some(mut sink) => sink.end().map_err(|e| match e {
                LayoutError::Other(err) => LayoutError::media(format!("closing output: {err:#}")),
                other => other,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/endpoint.rs"]
mod tests;
