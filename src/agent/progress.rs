//! Progress sinks for training runs.
//!
//! - `ProgressSink`: trait the training loop reports to
//! - `NoopSink`:     discards all reports
//! - `TracingSink`:  emits one `info` event per report
//! - `WriterSink`:   writes one line per report to any `Write`
//! - `LineCollector`: keeps the rendered lines in memory

use std::fmt;
use std::io::Write;

use tracing::{info, warn};

/// Totals of one finished training episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Zero-based episode index within the current `train` call.
    pub episode: usize,
    pub total_reward: f64,
    pub total_consumption_kwh: f64,
}

impl fmt::Display for EpisodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {} finished. Reward: {:.2}, Consumption: {:.2} kWh",
            self.episode, self.total_reward, self.total_consumption_kwh
        )
    }
}

/// Receiver of periodic training progress.
pub trait ProgressSink {
    fn episode_finished(&mut self, summary: &EpisodeSummary);
}

/// Sink that discards all reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn episode_finished(&mut self, _summary: &EpisodeSummary) {}
}

/// Sink that logs each report through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn episode_finished(&mut self, summary: &EpisodeSummary) {
        info!(
            episode = summary.episode,
            reward = summary.total_reward,
            consumption_kwh = summary.total_consumption_kwh,
            "{summary}"
        );
    }
}

/// Sink writing one human-readable line per report.
///
/// Write failures are logged and otherwise ignored; training carries on.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ProgressSink for WriterSink<W> {
    fn episode_finished(&mut self, summary: &EpisodeSummary) {
        if let Err(e) = writeln!(self.writer, "{summary}") {
            warn!(episode = summary.episode, error = %e, "failed to write progress line");
        }
    }
}

/// Sink that stores rendered lines.
#[derive(Debug, Default, Clone)]
pub struct LineCollector {
    pub lines: Vec<String>,
}

impl ProgressSink for LineCollector {
    fn episode_finished(&mut self, summary: &EpisodeSummary) {
        self.lines.push(summary.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> EpisodeSummary {
        EpisodeSummary {
            episode: 100,
            total_reward: 512.5,
            total_consumption_kwh: 3.5,
        }
    }

    #[test]
    fn summary_line_is_human_readable() {
        assert_eq!(
            summary().to_string(),
            "Episode 100 finished. Reward: 512.50, Consumption: 3.50 kWh"
        );
    }

    #[test]
    fn writer_sink_writes_one_line_per_report() {
        let mut sink = WriterSink::new(Vec::new());
        sink.episode_finished(&summary());
        sink.episode_finished(&summary());
        let out = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(out.lines().count(), 2);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_survives_write_errors() {
        let mut sink = WriterSink::new(FailingWriter);
        sink.episode_finished(&summary());
        sink.episode_finished(&summary());
    }

    #[test]
    fn collector_keeps_lines() {
        let mut sink = LineCollector::default();
        sink.episode_finished(&summary());
        assert_eq!(sink.lines.len(), 1);
        NoopSink.episode_finished(&summary());
    }
}
