use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::foundation::error::{LayoutError, LayoutResult};
use crate::media::ffmpeg::ensure_parent_dir;
use crate::picture::metric::QualityMetric;

/// Plain-text quality report: a header line with the metric names, then one line of
/// space-separated scores per processed frame.
pub struct QualityLog {
    writer: Box<dyn Write + Send>,
    metrics: Vec<QualityMetric>,
    header_written: bool,
    rows: u64,
}

impl std::fmt::Debug for QualityLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualityLog")
            .field("metrics", &self.metrics)
            .field("rows", &self.rows)
            .finish()
    }
}

impl QualityLog {
    /// Report written to `writer`.
    pub fn new(writer: Box<dyn Write + Send>, metrics: Vec<QualityMetric>) -> Self {
        Self {
            writer,
            metrics,
            header_written: false,
            rows: 0,
        }
    }

    /// Report written to a new file at `path`.
    pub fn create(path: &Path, metrics: Vec<QualityMetric>) -> LayoutResult<Self> {
        use anyhow::Context as _;
        ensure_parent_dir(path)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create quality report '{}'", path.display()))?;
        Ok(Self::new(Box::new(std::io::BufWriter::new(file)), metrics))
    }

    /// Report kept in memory, readable through the returned handle.
    pub fn in_memory(metrics: Vec<QualityMetric>) -> (Self, CapturedReport) {
        let report = CapturedReport::default();
        let log = Self::new(Box::new(report.clone()), metrics);
        (log, report)
    }

    /// Metrics, in column order.
    pub fn metrics(&self) -> &[QualityMetric] {
        &self.metrics
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Append one row of scores, one per metric.
    pub fn write_row(&mut self, scores: &[f64]) -> LayoutResult<()> {
        if scores.len() != self.metrics.len() {
            return Err(LayoutError::validation(format!(
                "quality row has {} scores for {} metrics",
                scores.len(),
                self.metrics.len()
            )));
        }
        if !self.header_written {
            let header = self
                .metrics
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(" ");
            self.write_line(&header)?;
            self.header_written = true;
        }
        let row = scores
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.write_line(&row)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush buffered output.
    pub fn finish(&mut self) -> LayoutResult<()> {
        use anyhow::Context as _;
        self.writer.flush().context("flush quality report")?;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> LayoutResult<()> {
        use anyhow::Context as _;
        writeln!(self.writer, "{line}").context("write quality report")?;
        Ok(())
    }
}

/// Text of an in-memory [`QualityLog`].
#[derive(Clone, Debug, Default)]
pub struct CapturedReport {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedReport {
    /// Report text written so far.
    pub fn text(&self) -> String {
        let guard = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl Write for CapturedReport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/quality_log.rs"]
mod tests;
