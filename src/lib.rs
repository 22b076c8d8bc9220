//! # rapid-bookrank
//!
//! Turns free-text input into a ranked list of catalog books.
//!
//! A request runs three stages:
//!
//! 1. **Keyphrase extraction**: named entities plus RAKE co-occurrence
//!    phrases, normalized, deduplicated and ordered longest first
//! 2. **Summarization**: short input passes through verbatim; longer input
//!    goes to a pluggable, timeout-bounded [`SummaryModel`]
//! 3. **Relevance scoring**: every record's title, genres and characters are
//!    fuzzy-matched against the keyphrases and its description against the
//!    summary; the four scores are averaged and the top K returned
//!
//! ## Example
//!
//! ```no_run
//! use rapid_bookrank::{
//!     CatalogRecord, ExtractiveModel, HeuristicRecognizer, PipelineConfig, QueryPipeline,
//! };
//!
//! # async fn demo() -> rapid_bookrank::Result<()> {
//! let pipeline = QueryPipeline::new(
//!     PipelineConfig::default(),
//!     HeuristicRecognizer::new(),
//!     ExtractiveModel::new(),
//! )?;
//!
//! let catalog = vec![CatalogRecord::new("1").with_title("The Lord of the Rings")];
//! let outcome = pipeline
//!     .run("A hobbit named Frodo Baggins must destroy a ring.", &catalog)
//!     .await?;
//!
//! for scored in outcome.results.iter() {
//!     println!("{} {:.1}", scored.record.title(), scored.relevance_score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The library emits `tracing` events and spans but never installs a
//! subscriber.

pub mod config;
pub mod errors;
pub mod graph;
pub mod nlp;
pub mod phrase;
pub mod pipeline;
pub mod scoring;
pub mod summarizer;
pub mod types;

pub use config::{
    ExtractorConfig, PhraseBounds, PipelineConfig, ScorerConfig, SummarizerConfig,
    SummaryFallback,
};
pub use errors::{PipelineError, Result};
pub use nlp::entities::{
    EntityLabel, EntityRecognizer, EntitySpan, HeuristicRecognizer, LazyRecognizer,
    NoopRecognizer,
};
pub use phrase::extraction::KeyphraseExtractor;
pub use phrase::normalize::Normalizer;
pub use pipeline::{
    NoopObserver, PipelineObserver, QueryOutcome, QueryPipeline, RunOptions, StageReport,
    StageTimingObserver,
};
pub use scoring::partial_ratio::partial_ratio;
pub use scoring::scorer::RelevanceScorer;
pub use summarizer::extractive::ExtractiveModel;
pub use summarizer::model::{GenerationParams, LazyModel, SummaryModel};
pub use summarizer::policy::Summarizer;
pub use types::{
    CatalogRecord, FieldScores, Keyphrase, KeyphraseSet, KeyphraseSource, RankedResult,
    ScoredRecord, Summary, SummaryKind,
};
