use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::factory::LayoutFactory;
use crate::config::model::ConfigDocument;
use crate::foundation::core::Fps;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::layout::view::{LayoutView, LayoutViewExt};
use crate::media::endpoint::LayoutEndpoint;
use crate::media::sink::{FrameSink, SinkConfig};
use crate::media::source::FrameSource;
use crate::picture::buffer::Picture;
use crate::picture::metric::QualityMetric;
use crate::session::quality_log::QualityLog;

/// Run statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames read from every input (skipped ones included).
    pub frames_read: u64,
    /// Frames remapped and written.
    pub frames_processed: u64,
    /// `true` when an input ran out before the requested frame count.
    pub stopped_early: bool,
}

#[derive(Clone, Debug)]
struct RunSettings {
    nb_frames: u64,
    start_frame: u64,
    step: u32,
    fps: f64,
    codec: String,
    metrics: Vec<QualityMetric>,
    threads: Option<usize>,
}

struct Stage {
    section: String,
    view: Box<dyn LayoutView>,
    endpoint: LayoutEndpoint,
}

struct Flow {
    input: PathBuf,
    stages: Vec<Stage>,
    output_path: Option<PathBuf>,
    output_bit_rate: i64,
    quality_path: Option<PathBuf>,
    quality: Option<QualityLog>,
}

impl Flow {
    fn head_mut(&mut self) -> LayoutResult<&mut Stage> {
        self.stages
            .first_mut()
            .ok_or_else(|| LayoutError::validation("flow has no layout"))
    }

    fn tail(&self) -> LayoutResult<&Stage> {
        self.stages
            .last()
            .ok_or_else(|| LayoutError::validation("flow has no layout"))
    }

    fn tail_mut(&mut self) -> LayoutResult<&mut Stage> {
        self.stages
            .last_mut()
            .ok_or_else(|| LayoutError::validation("flow has no layout"))
    }

    fn describe(&self) -> String {
        self.stages
            .iter()
            .map(|s| s.section.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Advance every layout to `t` and push `picture` through the chain.
    fn process(&mut self, picture: Picture, t: f64) -> Picture {
        for stage in &mut self.stages {
            stage.view.next_step(t);
        }
        let mut out = picture;
        for i in 1..self.stages.len() {
            let original: &dyn LayoutView = &*self.stages[i - 1].view;
            out = self.stages[i].view.from_layout(&out, original);
        }
        out
    }
}

/// Drives every flow of a configuration frame by frame: read, remap along the layout chain,
/// write, and measure the quality of each flow against the first one.
pub struct FlowSession {
    flows: Vec<Flow>,
    settings: RunSettings,
}

impl std::fmt::Debug for FlowSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowSession")
            .field(
                "flows",
                &self.flows.iter().map(Flow::describe).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings)
            .finish()
    }
}

impl FlowSession {
    /// Build every flow's layouts from `doc`. Media is opened later, by
    /// [`FlowSession::open_media`] or [`FlowSession::run`].
    pub fn from_config(doc: &ConfigDocument) -> LayoutResult<Self> {
        let g = &doc.global;
        if g.display_final_pict {
            tracing::debug!("displayFinalPict is set; pictures are not displayed");
        }
        let settings = RunSettings {
            nb_frames: g.nb_frames,
            start_frame: g.start_frame,
            step: g.step(),
            fps: g.fps,
            codec: g.codec().to_owned(),
            metrics: g.quality_metrics()?,
            threads: g.threads,
        };
        let interpolation = g.interpolation();
        let factory = LayoutFactory::new(doc);

        let mut flows = Vec::new();
        for (j, spec) in g.flows().into_iter().enumerate() {
            let views = factory.build_flow(&spec.sections, interpolation)?;
            let last = spec.sections.last().map(String::as_str).unwrap_or_default();
            let output_path = (!g.video_output_name.is_empty())
                .then(|| numbered_path(&doc.resolve_path(&g.video_output_name), j, last));
            let quality_path = (j > 0 && !g.quality_output_name.is_empty())
                .then(|| numbered_path(&doc.resolve_path(&g.quality_output_name), j, last));
            let stages = spec
                .sections
                .iter()
                .cloned()
                .zip(views)
                .map(|(section, view)| Stage {
                    section,
                    view,
                    endpoint: LayoutEndpoint::new(),
                })
                .collect();
            let flow = Flow {
                input: doc.resolve_path(&spec.input),
                stages,
                output_path,
                output_bit_rate: factory.output_bit_rate(last)?,
                quality_path,
                quality: None,
            };
            tracing::info!(
                flow = j + 1,
                layouts = %flow.describe(),
                input = %flow.input.display(),
                "flow built"
            );
            flows.push(flow);
        }
        Ok(Self { flows, settings })
    }

    /// Number of flows.
    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    /// Section names of flow `j`, head first.
    pub fn flow_sections(&self, j: usize) -> LayoutResult<Vec<&str>> {
        Ok(self
            .flow(j)?
            .stages
            .iter()
            .map(|s| s.section.as_str())
            .collect())
    }

    /// Last layout of flow `j`.
    pub fn output_layout(&self, j: usize) -> LayoutResult<&dyn LayoutView> {
        Ok(&*self.flow(j)?.tail()?.view)
    }

    /// Output video path of flow `j`, when video output is enabled.
    pub fn output_video_path(&self, j: usize) -> LayoutResult<Option<&Path>> {
        Ok(self.flow(j)?.output_path.as_deref())
    }

    /// Quality report path of flow `j`, when quality output is enabled (never for flow 0).
    pub fn quality_path(&self, j: usize) -> LayoutResult<Option<&Path>> {
        Ok(self.flow(j)?.quality_path.as_deref())
    }

    /// Encoder configuration for the output of flow `j`.
    pub fn sink_config(&self, j: usize) -> LayoutResult<SinkConfig> {
        sink_config(&self.settings, self.flow(j)?)
    }

    /// Read flow `j`'s input from `source` instead of its configured video.
    pub fn set_input_source(&mut self, j: usize, source: Box<dyn FrameSource>) -> LayoutResult<()> {
        self.flow_mut(j)?.head_mut()?.endpoint.init_input_source(source);
        Ok(())
    }

    /// Write flow `j`'s output to `sink` instead of the configured video.
    pub fn set_output_sink(&mut self, j: usize, sink: Box<dyn FrameSink>) -> LayoutResult<()> {
        let cfg = self.sink_config(j)?;
        self.flow_mut(j)?.tail_mut()?.endpoint.init_output_sink(sink, cfg)
    }

    /// Write flow `j`'s quality scores to `log`. Flow 0 is the reference and has no report.
    pub fn set_quality_log(&mut self, j: usize, log: QualityLog) -> LayoutResult<()> {
        if j == 0 {
            return Err(LayoutError::validation(
                "flow 0 is the quality reference and has no quality report",
            ));
        }
        let flow = self.flow_mut(j)?;
        if flow.quality.is_none() {
            flow.quality = Some(log);
        }
        Ok(())
    }

    /// Open configured inputs, outputs and quality reports that were not set explicitly.
    pub fn open_media(&mut self) -> LayoutResult<()> {
        let settings = &self.settings;
        let frame_limit = Some(settings.nb_frames + settings.start_frame);
        for (j, flow) in self.flows.iter_mut().enumerate() {
            let input = flow.input.clone();
            let head = flow.head_mut()?;
            head.endpoint.init_input_video(&input, frame_limit)?;
            if let Some(res) = head.endpoint.input_resolution()
                && res != head.view.resolution()
            {
                tracing::warn!(
                    flow = j + 1,
                    input = ?res,
                    layout = ?head.view.resolution(),
                    "input size differs from the head layout size"
                );
            }

            if let Some(path) = flow.output_path.clone()
                && !flow.tail()?.endpoint.has_output()
            {
                let cfg = sink_config(settings, flow)?;
                tracing::info!(flow = j + 1, path = %path.display(), "output video");
                flow.tail_mut()?.endpoint.init_output_video(&path, cfg)?;
            }

            if flow.quality.is_none()
                && !settings.metrics.is_empty()
                && let Some(path) = &flow.quality_path
            {
                tracing::info!(flow = j + 1, path = %path.display(), "quality report");
                flow.quality = Some(QualityLog::create(path, settings.metrics.clone())?);
            }
        }
        Ok(())
    }

    /// Open missing media, process every frame, then close all outputs.
    pub fn run(&mut self) -> LayoutResult<RunStats> {
        self.open_media()?;
        let pool = build_thread_pool(self.settings.threads)?;
        let result = pool.install(|| self.run_frames());
        let closed = self.finish();
        let stats = result?;
        closed?;
        Ok(stats)
    }

    fn run_frames(&mut self) -> LayoutResult<RunStats> {
        let start = self.settings.start_frame;
        let step = u64::from(self.settings.step);
        let total = self.settings.nb_frames + start;
        let started = Instant::now();
        let mut stats = RunStats::default();

        for count in 0..total {
            let frame_started = Instant::now();
            let process = count >= start && (count - start) % step == 0;
            let t = count.saturating_sub(start) as f64 / self.settings.fps;

            let mut outputs = Vec::with_capacity(self.flows.len());
            for (j, flow) in self.flows.iter_mut().enumerate() {
                let Some(picture) = flow.head_mut()?.endpoint.read_next_picture_from_video()? else {
                    tracing::warn!(flow = j + 1, frame = count, "input exhausted, stopping");
                    stats.stopped_early = true;
                    return Ok(stats);
                };
                if process {
                    tracing::debug!(
                        flow = j + 1,
                        frame = count,
                        t,
                        layouts = %flow.describe(),
                        "remap"
                    );
                    outputs.push(Some(flow.process(picture, t)));
                } else {
                    outputs.push(None);
                }
            }
            stats.frames_read += 1;
            if !process {
                tracing::info!(frame = count, "skip");
                continue;
            }

            self.measure_quality(count, &outputs)?;
            for (flow, out) in self.flows.iter_mut().zip(&outputs) {
                if let Some(picture) = out {
                    flow.tail_mut()?.endpoint.write_picture_to_video(picture)?;
                }
            }
            stats.frames_processed += 1;

            let done = count + 1;
            let average = started.elapsed().as_secs_f64() / done as f64;
            tracing::info!(
                frame = count,
                elapsed_ms = frame_started.elapsed().as_millis() as u64,
                remaining_s = average * (total - done) as f64,
                "frame processed"
            );
        }
        Ok(stats)
    }

    fn measure_quality(&mut self, count: u64, outputs: &[Option<Picture>]) -> LayoutResult<()> {
        let metrics = &self.settings.metrics;
        if metrics.is_empty() {
            return Ok(());
        }
        let Some(Some(reference)) = outputs.first() else {
            return Ok(());
        };
        let Some((head, rest)) = self.flows.split_first_mut() else {
            return Ok(());
        };
        let reference_layout: &dyn LayoutView = &*head.tail()?.view;

        for (k, flow) in rest.iter_mut().enumerate() {
            let j = k + 1;
            let Some(Some(candidate)) = outputs.get(j) else {
                continue;
            };
            let Some(log) = flow.quality.as_mut() else {
                continue;
            };
            let Some(candidate_stage) = flow.stages.last() else {
                continue;
            };
            let mut scores = Vec::with_capacity(metrics.len());
            for &metric in metrics {
                let score = match metric.evaluate(
                    reference,
                    reference_layout,
                    candidate,
                    &*candidate_stage.view,
                ) {
                    Ok(score) => score,
                    Err(LayoutError::Metric(msg)) => {
                        tracing::warn!(flow = j + 1, frame = count, %metric, "{msg}");
                        f64::NAN
                    }
                    Err(e) => return Err(e),
                };
                tracing::info!(flow = j + 1, frame = count, %metric, score);
                scores.push(score);
            }
            log.write_row(&scores)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> LayoutResult<()> {
        let mut first_err = None;
        for flow in &mut self.flows {
            for stage in &mut flow.stages {
                if let Err(e) = stage.endpoint.finish() {
                    first_err.get_or_insert(e);
                }
            }
            if let Some(log) = flow.quality.as_mut()
                && let Err(e) = log.finish()
            {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn flow(&self, j: usize) -> LayoutResult<&Flow> {
        self.flows
            .get(j)
            .ok_or_else(|| LayoutError::validation(format!("no flow {j}")))
    }

    fn flow_mut(&mut self, j: usize) -> LayoutResult<&mut Flow> {
        self.flows
            .get_mut(j)
            .ok_or_else(|| LayoutError::validation(format!("no flow {j}")))
    }
}

/// Remap a single picture from layout section `from` to section `to` of `doc`.
///
/// `to` may size itself relative to `from`.
pub fn remap_picture(
    doc: &ConfigDocument,
    from: &str,
    to: &str,
    picture: &Picture,
) -> LayoutResult<Picture> {
    let sections = [from.to_owned(), to.to_owned()];
    let layouts = LayoutFactory::new(doc).build_flow(&sections, doc.global.interpolation())?;
    let [source, dest] = layouts.as_slice() else {
        return Err(LayoutError::validation("expected two layouts"));
    };
    if picture.width() != source.width() || picture.height() != source.height() {
        return Err(LayoutError::validation(format!(
            "picture is {}x{} but layout '{from}' is {}x{}",
            picture.width(),
            picture.height(),
            source.width(),
            source.height()
        )));
    }
    Ok(dest.from_layout(picture, &**source))
}

/// `<stem><flow + 1><section><.ext>` next to `base`.
pub(crate) fn numbered_path(base: &Path, flow: usize, section: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    base.with_file_name(format!("{stem}{}{section}{ext}", flow + 1))
}

fn sink_config(settings: &RunSettings, flow: &Flow) -> LayoutResult<SinkConfig> {
    let tail = flow.tail()?;
    let fps = Fps::from_f64(settings.fps)?.divided_by(settings.step)?;
    let step = f64::from(settings.step);
    let mut cfg = SinkConfig::new(tail.view.width(), tail.view.height(), fps);
    cfg.codec = settings.codec.clone();
    cfg.gop_size = ((settings.fps / (2.0 * step)) as u32).max(1);
    cfg.bit_rate = flow.output_bit_rate;
    Ok(cfg)
}

fn build_thread_pool(threads: Option<usize>) -> LayoutResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LayoutError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LayoutError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/flow.rs"]
mod tests;
