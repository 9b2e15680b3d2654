//! Progress reporting.
//!
//! Long scans report through an injected [`ProgressSink`] at a handful of
//! checkpoints instead of printing from inside the algorithms.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Records between two progress checkpoints in line-oriented scans.
pub const REPORT_INTERVAL: u64 = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stubs,
    GraphBuild,
    ClosureRound,
    Redirects,
    Pages,
    Terms,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Stubs => "stubs",
            Stage::GraphBuild => "category links",
            Stage::ClosureRound => "closure round",
            Stage::Redirects => "redirects",
            Stage::Pages => "pages",
            Stage::Terms => "terms checked",
        }
    }
}

pub trait ProgressSink: Sync {
    fn advance(&self, stage: Stage, done: u64);

    fn finish(&self, stage: Stage, done: u64) {
        self.advance(stage, done);
    }
}

/// Discards every checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self, _stage: Stage, _done: u64) {}
}

/// Emits checkpoints as DEBUG events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn advance(&self, stage: Stage, done: u64) {
        tracing::debug!(stage = stage.label(), done, "progress");
    }

    fn finish(&self, stage: Stage, done: u64) {
        tracing::info!(stage = stage.label(), done, "stage finished");
    }
}

/// Terminal spinner for interactive runs.
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {elapsed:>4} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SpinnerProgress {
    fn advance(&self, stage: Stage, done: u64) {
        self.bar.set_message(format!("{}: {}", stage.label(), done));
    }

    fn finish(&self, stage: Stage, done: u64) {
        self.bar.println(format!("{}: {} done", stage.label(), done));
    }
}

impl Drop for SpinnerProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
