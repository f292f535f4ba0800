//! Video IO through the system `ffmpeg`/`ffprobe` binaries.
//!
//! Decoding reads raw `rgb24` frames from `ffmpeg`'s stdout and encoding writes them to its
//! stdin. In both directions stderr is collected on a helper thread and reported on failure.

use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::core::{Fps, FrameIndex, Resolution};
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::media::sink::{FrameSink, SinkConfig};
use crate::media::source::FrameSource;
use crate::picture::buffer::{CHANNELS, Picture};

type StderrDrain = JoinHandle<std::io::Result<Vec<u8>>>;

/// Stream layout of a media file as reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeInfo {
    /// Size of the first video stream.
    pub resolution: Resolution,
    /// Number of video streams.
    pub video_streams: usize,
    /// Frame rate of the first video stream, when known.
    pub fps: Option<Fps>,
}

#[derive(serde::Deserialize)]
struct FfprobeReport {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(serde::Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Inspect `path` with `ffprobe`.
pub fn probe_video(path: &Path) -> LayoutResult<ProbeInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "stream=codec_type,width,height,r_frame_rate",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| LayoutError::media(format!("cannot run ffprobe: {e}")))?;
    if !output.status.success() {
        return Err(LayoutError::media(format!(
            "ffprobe rejected '{}': {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let report: FfprobeReport = serde_json::from_slice(&output.stdout)
        .map_err(|e| LayoutError::media(format!("unreadable ffprobe report: {e}")))?;
    let mut videos = report
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"));
    let Some(first) = videos.next() else {
        return Err(LayoutError::media(format!(
            "'{}' has no video stream",
            path.display()
        )));
    };
    let (Some(width), Some(height)) = (first.width, first.height) else {
        return Err(LayoutError::media(format!(
            "ffprobe reported no frame size for '{}'",
            path.display()
        )));
    };

    Ok(ProbeInfo {
        resolution: Resolution::new(width, height),
        video_streams: 1 + videos.count(),
        fps: first
            .r_frame_rate
            .as_deref()
            .and_then(parse_ff_ratio)
            .and_then(|(num, den)| Fps::new(num, den).ok()),
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let (num, den) = s.split_once('/').unwrap_or((s, "1"));
    Some((num.trim().parse().ok()?, den.trim().parse().ok()?))
}

fn binary_runs(name: &str) -> bool {
    Command::new(name)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    binary_runs("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    binary_runs("ffprobe")
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> LayoutResult<()> {
    use anyhow::Context as _;

    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create directory '{}'", dir.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Spawn `cmd` with piped stderr and start collecting it.
fn spawn_ffmpeg(cmd: &mut Command) -> LayoutResult<(Child, StderrDrain)> {
    let mut child = cmd.stderr(Stdio::piped()).spawn().map_err(|e| {
        LayoutError::media(format!("cannot start ffmpeg, is it installed? {e}"))
    })?;
    let Some(mut stderr) = child.stderr.take() else {
        let _ = child.kill();
        return Err(LayoutError::media("ffmpeg stderr pipe missing"));
    };
    let drain = std::thread::spawn(move || {
        let mut bytes = Vec::new();
        stderr.read_to_end(&mut bytes)?;
        Ok(bytes)
    });
    Ok((child, drain))
}

/// Wait for `child` and turn a failed exit into a media error carrying its stderr.
fn reap(mut child: Child, drain: StderrDrain, what: &str) -> LayoutResult<()> {
    let status = child
        .wait()
        .map_err(|e| LayoutError::media(format!("{what}: wait failed: {e}")))?;
    let stderr = drain
        .join()
        .map_err(|_| LayoutError::media(format!("{what}: stderr reader panicked")))?
        .map_err(|e| LayoutError::media(format!("{what}: stderr unreadable: {e}")))?;
    if status.success() {
        return Ok(());
    }
    Err(LayoutError::media(format!(
        "{what}: ffmpeg exited with {status}: {}",
        String::from_utf8_lossy(&stderr).trim()
    )))
}

/// Decodes the only video stream of a media file into pictures.
pub struct FfmpegSource {
    path: PathBuf,
    resolution: Resolution,
    decoder: Option<(Child, ChildStdout, StderrDrain)>,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it, stopping after `frame_limit` frames when set.
    ///
    /// Files with more or fewer than one video stream are rejected.
    pub fn open(path: &Path, frame_limit: Option<u64>) -> LayoutResult<Self> {
        let info = probe_video(path)?;
        if info.video_streams != 1 {
            return Err(LayoutError::config(format!(
                "unsupported number of video streams in '{}': {} instead of 1",
                path.display(),
                info.video_streams
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .args(["-nostdin", "-loglevel", "error", "-i"])
            .arg(path)
            .args(["-map", "0:v:0"]);
        if let Some(n) = frame_limit {
            cmd.arg("-frames:v").arg(n.to_string());
        }
        cmd.args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"]);

        let (mut child, drain) = spawn_ffmpeg(&mut cmd)?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(LayoutError::media("ffmpeg stdout pipe missing"));
        };

        tracing::debug!(
            path = %path.display(),
            w = info.resolution.width,
            h = info.resolution.height,
            "opened video input"
        );
        Ok(Self {
            path: path.to_path_buf(),
            resolution: info.resolution,
            decoder: Some((child, stdout, drain)),
        })
    }

    fn close(&mut self) -> LayoutResult<()> {
        match self.decoder.take() {
            Some((child, stdout, drain)) => {
                drop(stdout);
                reap(child, drain, &format!("decoding '{}'", self.path.display()))
            }
            None => Ok(()),
        }
    }
}

impl FrameSource for FfmpegSource {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn next_picture(&mut self) -> LayoutResult<Option<Picture>> {
        let Some((_, stdout, _)) = self.decoder.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.resolution.area() as usize * CHANNELS];
        let mut filled = 0;
        while filled < buf.len() {
            match stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(LayoutError::media(format!(
                        "reading frames of '{}': {e}",
                        self.path.display()
                    )));
                }
            }
        }
        match filled {
            0 => {
                self.close()?;
                Ok(None)
            }
            n if n < buf.len() => {
                self.close()?;
                Err(LayoutError::media(format!(
                    "truncated frame from '{}': {n} of {} bytes",
                    self.path.display(),
                    buf.len()
                )))
            }
            _ => Picture::from_raw(self.resolution.width, self.resolution.height, buf).map(Some),
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if let Some((mut child, stdout, _)) = self.decoder.take() {
            drop(stdout);
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Encoder arguments for `cfg`, placed after the input.
pub(crate) fn encoder_args(cfg: &SinkConfig) -> Vec<String> {
    let mut args: Vec<String> = vec!["-an".into()];
    if cfg.width % 2 == 1 || cfg.height % 2 == 1 {
        args.push("-vf".into());
        args.push("pad=ceil(iw/2)*2:ceil(ih/2)*2".into());
    }
    args.push("-c:v".into());
    args.push(cfg.codec.clone());
    args.push("-g".into());
    args.push(cfg.gop_size.max(1).to_string());
    match cfg.bit_rate {
        b if b > 0 => {
            args.push("-b:v".into());
            args.push(b.to_string());
        }
        b if b < 0 && cfg.codec == "libx265" => {
            args.push("-x265-params".into());
            args.push("lossless=1".into());
        }
        _ => {}
    }
    args.push("-pix_fmt".into());
    args.push("yuv420p".into());
    args
}

struct Encoder {
    cfg: SinkConfig,
    child: Child,
    stdin: ChildStdin,
    drain: StderrDrain,
    last: Option<FrameIndex>,
}

/// Encodes pictures into a video file through a spawned `ffmpeg`.
///
/// Odd picture sizes are padded to even ones for the `yuv420p` output. An existing file at the
/// output path is replaced.
pub struct FfmpegSink {
    path: PathBuf,
    encoder: Option<Encoder>,
}

impl FfmpegSink {
    /// Sink writing to `path`. Nothing is spawned before [`FrameSink::begin`].
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoder: None,
        }
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn not_started(&self) -> LayoutError {
        LayoutError::media(format!(
            "video output '{}' was not started",
            self.path.display()
        ))
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LayoutResult<()> {
        if self.encoder.is_some() {
            return Err(LayoutError::media(format!(
                "video output '{}' already started",
                self.path.display()
            )));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LayoutError::validation(format!(
                "video output size must be non-zero, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        if cfg.codec.trim().is_empty() {
            return Err(LayoutError::config("video output codec must not be empty"));
        }
        ensure_parent_dir(&self.path)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .arg("-video_size")
            .arg(format!("{}x{}", cfg.width, cfg.height))
            .arg("-framerate")
            .arg(format!("{}/{}", cfg.fps.num, cfg.fps.den))
            .args(["-i", "-"])
            .args(encoder_args(&cfg))
            .arg(&self.path);

        let (mut child, drain) = spawn_ffmpeg(&mut cmd)?;
        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            return Err(LayoutError::media("ffmpeg stdin pipe missing"));
        };
        tracing::debug!(
            path = %self.path.display(),
            codec = %cfg.codec,
            bit_rate = cfg.bit_rate,
            "started video output"
        );
        self.encoder = Some(Encoder {
            cfg,
            child,
            stdin,
            drain,
            last: None,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, picture: &Picture) -> LayoutResult<()> {
        let Some(enc) = self.encoder.as_mut() else {
            return Err(self.not_started());
        };
        if enc.last.is_some_and(|last| idx <= last) {
            return Err(LayoutError::media(format!(
                "frame {} pushed after frame {}",
                idx.0,
                enc.last.map_or(0, |l| l.0)
            )));
        }
        if (picture.width(), picture.height()) != (enc.cfg.width, enc.cfg.height) {
            return Err(LayoutError::validation(format!(
                "picture is {}x{}, video output expects {}x{}",
                picture.width(),
                picture.height(),
                enc.cfg.width,
                enc.cfg.height
            )));
        }
        enc.stdin.write_all(picture.as_raw()).map_err(|e| {
            LayoutError::media(format!(
                "writing frame {} to '{}': {e}",
                idx.0,
                self.path.display()
            ))
        })?;
        enc.last = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> LayoutResult<()> {
        let Some(enc) = self.encoder.take() else {
            return Err(self.not_started());
        };
        drop(enc.stdin);
        reap(
            enc.child,
            enc.drain,
            &format!("encoding '{}'", self.path.display()),
        )
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(mut enc) = self.encoder.take() {
            drop(enc.stdin);
            let _ = enc.child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
