//! Pipeline configuration.
//!
//! A [`PipelineConfig`] groups per-stage settings. Every section has
//! serde defaults, so a partial JSON document is enough:
//!
//! ```json
//! {
//!   "extractor": { "top_n": 8, "max_phrase_words": 3 },
//!   "summarizer": { "timeout_ms": 5000, "fallback": "fail" },
//!   "scorer": { "top_k": 15 }
//! }
//! ```
//!
//! Configuration is validated once, when the pipeline is built. A bad value
//! is a programming error, not a per-request condition.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, Result};

/// Top-level configuration for a [`QueryPipeline`](crate::pipeline::QueryPipeline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extractor: ExtractorConfig,
    pub summarizer: SummarizerConfig,
    pub scorer: ScorerConfig,
}

impl PipelineConfig {
    /// Parse a JSON document. Omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PipelineError::InvalidConfiguration(format!("malformed config: {e}")))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.summarizer.validate()?;
        self.scorer.validate()
    }
}

// ─── Extractor ──────────────────────────────────────────────────────────────

/// Keyphrase extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Shortest RAKE phrase kept, in words.
    pub min_phrase_words: usize,
    /// Longest RAKE phrase kept, in words.
    pub max_phrase_words: usize,
    /// Keyphrases returned per request.
    pub top_n: usize,
    /// Words added to the English stopword list.
    pub extra_stopwords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_phrase_words: 1,
            max_phrase_words: 4,
            top_n: 5,
            extra_stopwords: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "top_n must be greater than 0".into(),
            ));
        }
        self.phrase_bounds().map(|_| ())
    }

    pub fn phrase_bounds(&self) -> Result<PhraseBounds> {
        PhraseBounds::new(self.min_phrase_words, self.max_phrase_words)
    }
}

/// Inclusive `[min, max]` word-count bounds for RAKE phrases.
///
/// Only constructible through [`PhraseBounds::new`], so the bounds are never
/// inverted or zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseBounds {
    min: usize,
    max: usize,
}

impl PhraseBounds {
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "min_phrase_words must be greater than 0".into(),
            ));
        }
        if min > max {
            return Err(PipelineError::InvalidConfiguration(format!(
                "min_phrase_words ({min}) must be <= max_phrase_words ({max})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn contains(&self, words: usize) -> bool {
        (self.min..=self.max).contains(&words)
    }
}

impl Default for PhraseBounds {
    fn default() -> Self {
        Self { min: 1, max: 4 }
    }
}

// ─── Summarizer ─────────────────────────────────────────────────────────────

/// What the pipeline does when the summarization model is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFallback {
    /// Use the truncated input as the summary and keep going.
    #[default]
    Passthrough,
    /// Fail the request with `SummarizationUnavailable`.
    Fail,
}

/// Summarization policy and generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Inputs with fewer words than this are returned verbatim.
    pub passthrough_word_threshold: usize,
    /// Input is cut to this many characters before reaching the model.
    pub max_input_chars: usize,
    /// Longest summary, in words.
    pub max_length: usize,
    /// Shortest summary the model should aim for, in words.
    pub min_length: usize,
    pub length_penalty: f64,
    pub num_beams: usize,
    pub early_stopping: bool,
    /// Upper bound on one model call.
    pub timeout_ms: u64,
    pub fallback: SummaryFallback,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            passthrough_word_threshold: 15,
            max_input_chars: 512,
            max_length: 60,
            min_length: 20,
            length_penalty: 2.0,
            num_beams: 4,
            early_stopping: true,
            timeout_ms: 30_000,
            fallback: SummaryFallback::Passthrough,
        }
    }
}

impl SummarizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_input_chars == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "max_input_chars must be greater than 0".into(),
            ));
        }
        if self.max_length == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "max_length must be greater than 0".into(),
            ));
        }
        if self.min_length > self.max_length {
            return Err(PipelineError::InvalidConfiguration(format!(
                "min_length ({}) must be <= max_length ({})",
                self.min_length, self.max_length
            )));
        }
        if self.num_beams == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "num_beams must be greater than 0".into(),
            ));
        }
        if !self.length_penalty.is_finite() {
            return Err(PipelineError::InvalidConfiguration(
                "length_penalty must be finite".into(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ─── Scorer ─────────────────────────────────────────────────────────────────

/// Relevance scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Records returned per request.
    pub top_k: usize,
    /// Catalog size at which scoring switches to rayon.
    pub parallel_threshold: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            parallel_threshold: 256,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "top_k must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
