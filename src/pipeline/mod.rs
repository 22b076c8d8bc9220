//! Request pipeline
//!
//! [`QueryPipeline`] wires the keyphrase extractor, summarizer and scorer
//! together; observers hook into its stage boundaries.

pub mod observer;
pub mod runner;

pub use observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use runner::{QueryOutcome, QueryPipeline, RunOptions};
