//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Every hook has an empty default, so an observer implements
//! only what it needs.

use std::time::{Duration, Instant};

use crate::types::{KeyphraseSet, RankedResult, Summary};

/// Keyphrase extraction stage.
pub const STAGE_EXTRACT: &str = "extract";
/// Summarization stage.
pub const STAGE_SUMMARIZE: &str = "summarize";
/// Catalog scoring stage.
pub const STAGE_SCORE: &str = "score";

/// Wall-clock timer for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// What a stage reports when it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    elapsed: Duration,
    items: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            items: None,
        }
    }

    /// Attach the number of items the stage produced.
    pub fn with_items(mut self, items: usize) -> Self {
        self.items = Some(items);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn items(&self) -> Option<usize> {
        self.items
    }
}

/// Stage-boundary callbacks.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    fn on_keyphrases(&mut self, _keyphrases: &KeyphraseSet) {}

    fn on_summary(&mut self, _summary: &Summary) {}

    fn on_results(&mut self, _results: &RankedResult<'_>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records a [`StageReport`] per finished stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report for `stage`, if it ran.
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, report)| report)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        tracing::trace!(stage, elapsed_us = report.elapsed().as_micros() as u64, "stage finished");
        self.reports.push((stage, *report));
    }
}
