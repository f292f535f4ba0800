use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{FrameIndex, Resolution};
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::media::ffmpeg::ensure_parent_dir;
use crate::media::sink::{FrameSink, SinkConfig};
use crate::media::source::FrameSource;
use crate::picture::buffer::Picture;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

/// `true` when `path` names a still image by its extension.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Reads pictures from a single image file or from every image of a directory, in file name
/// order.
#[derive(Debug)]
pub struct ImageSequenceSource {
    resolution: Resolution,
    files: VecDeque<PathBuf>,
}

impl ImageSequenceSource {
    /// Open `path` (an image file or a directory of images), keeping at most `frame_limit`
    /// pictures when set.
    pub fn open(path: &Path, frame_limit: Option<u64>) -> LayoutResult<Self> {
        let mut files = if path.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("list image directory '{}'", path.display()))?
            {
                let entry = entry
                    .with_context(|| format!("list image directory '{}'", path.display()))?;
                let p = entry.path();
                if p.is_file() && is_image_file(&p) {
                    files.push(p);
                }
            }
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };
        if let Some(n) = frame_limit {
            files.truncate(usize::try_from(n).unwrap_or(usize::MAX));
        }
        let first = files.first().ok_or_else(|| {
            LayoutError::media(format!("no images found in '{}'", path.display()))
        })?;
        let (width, height) = image::image_dimensions(first)
            .with_context(|| format!("read image header '{}'", first.display()))?;
        Ok(Self {
            resolution: Resolution::new(width, height),
            files: files.into(),
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn next_picture(&mut self) -> LayoutResult<Option<Picture>> {
        let Some(path) = self.files.pop_front() else {
            return Ok(None);
        };
        let pic = Picture::open(&path)?;
        if pic.width() != self.resolution.width || pic.height() != self.resolution.height {
            return Err(LayoutError::media(format!(
                "'{}' is {}x{}, expected {}x{}",
                path.display(),
                pic.width(),
                pic.height(),
                self.resolution.width,
                self.resolution.height
            )));
        }
        Ok(Some(pic))
    }
}

/// Writes every picture as a numbered PNG file.
///
/// For a target `dir/name.png` the files are `dir/name_000000.png`, `dir/name_000001.png`, ...;
/// any other target is used as a directory holding `frame_000000.png`, ...
#[derive(Debug)]
pub struct ImageSequenceSink {
    dir: PathBuf,
    prefix: String,
    written: u64,
    cfg: Option<SinkConfig>,
}

impl ImageSequenceSink {
    /// Sink writing next to (or into) `target`.
    pub fn new(target: &Path) -> Self {
        let (dir, prefix) = if is_image_file(target) {
            let dir = target.parent().map(Path::to_path_buf).unwrap_or_default();
            let stem = target
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "frame".to_owned());
            (dir, stem)
        } else {
            (target.to_path_buf(), "frame".to_owned())
        };
        Self {
            dir,
            prefix,
            written: 0,
            cfg: None,
        }
    }

    /// Path of the `n`-th written picture.
    pub fn frame_path(&self, n: u64) -> PathBuf {
        self.dir.join(format!("{}_{n:06}.png", self.prefix))
    }

    /// Number of pictures written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for ImageSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> LayoutResult<()> {
        ensure_parent_dir(&self.frame_path(0))?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, picture: &Picture) -> LayoutResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LayoutError::media("image sequence sink not started"))?;
        if picture.width() != cfg.width || picture.height() != cfg.height {
            return Err(LayoutError::validation(format!(
                "picture size mismatch: got {}x{}, expected {}x{}",
                picture.width(),
                picture.height(),
                cfg.width,
                cfg.height
            )));
        }
        picture.save(&self.frame_path(self.written))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> LayoutResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/image_seq.rs"]
mod tests;
