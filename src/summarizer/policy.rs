//! Summarization policy
//!
//! Wraps a [`SummaryModel`] with the request-level rules:
//!
//! - Fewer than `passthrough_word_threshold` words: the input is returned
//!   verbatim and the model is never called.
//! - Otherwise the input is cut to `max_input_chars` characters and handed
//!   to the model under `timeout_ms`, or a per-call timeout when given.
//! - Model errors, timeouts and empty generations all surface as
//!   [`PipelineError::SummarizationUnavailable`]. Whether to degrade is the
//!   caller's decision; [`Summarizer::fallback_summary`] provides the
//!   degraded value.

use std::time::Duration;

use tracing::Instrument;

use super::model::{GenerationParams, SummaryModel};
use crate::config::{SummarizerConfig, SummaryFallback};
use crate::errors::{PipelineError, Result};
use crate::nlp::tokenizer::word_count;
use crate::types::Summary;

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(at, _)| &text[..at])
}

/// The first `max_words` whitespace-separated words, single-spaced.
pub fn clamp_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A summarization model plus its invocation policy.
#[derive(Debug, Clone)]
pub struct Summarizer<M> {
    model: M,
    config: SummarizerConfig,
    params: GenerationParams,
}

impl<M: SummaryModel> Summarizer<M> {
    pub fn new(model: M, config: SummarizerConfig) -> Result<Self> {
        config.validate()?;
        let params = GenerationParams::from(&config);
        Ok(Self {
            model,
            config,
            params,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Summarize `text` within the configured timeout.
    pub async fn summarize(&self, text: &str) -> Result<Summary> {
        self.summarize_within(text, self.config.timeout()).await
    }

    /// Summarize `text`, giving the model at most `timeout`.
    pub async fn summarize_within(&self, text: &str, timeout: Duration) -> Result<Summary> {
        let words = word_count(text);
        if words < self.config.passthrough_word_threshold {
            tracing::trace!(words, "summary passthrough");
            return Ok(Summary::passthrough(text));
        }

        let prompt = truncate_chars(text, self.config.max_input_chars);
        let call = self
            .model
            .generate(prompt, &self.params)
            .instrument(tracing::debug_span!("summary_model", prompt_chars = prompt.len()));

        let generated = match tokio::time::timeout(timeout, call).await {
            Err(_) => {
                return Err(PipelineError::SummarizationUnavailable(format!(
                    "timed out after {}ms",
                    timeout.as_millis()
                )))
            }
            Ok(Err(err)) => {
                return Err(PipelineError::SummarizationUnavailable(err.to_string()))
            }
            Ok(Ok(generated)) => generated,
        };

        let text = clamp_words(&generated, self.config.max_length);
        if text.is_empty() {
            return Err(PipelineError::SummarizationUnavailable(
                "model returned an empty summary".into(),
            ));
        }
        Ok(Summary::generated(text))
    }

    /// The degraded summary used when the model is unavailable: the input
    /// truncated to the model's character budget, then to `max_length` words.
    pub fn fallback_summary(&self, text: &str) -> Summary {
        let truncated = truncate_chars(text, self.config.max_input_chars);
        Summary::fallback(clamp_words(truncated, self.config.max_length))
    }

    /// Summarize, applying the configured [`SummaryFallback`] on failure.
    ///
    /// `timeout` overrides the configured model timeout for this call.
    pub async fn summarize_or_fallback(
        &self,
        text: &str,
        timeout: Option<Duration>,
    ) -> Result<Summary> {
        let timeout = timeout.unwrap_or_else(|| self.config.timeout());
        match self.summarize_within(text, timeout).await {
            Err(PipelineError::SummarizationUnavailable(reason))
                if self.config.fallback == SummaryFallback::Passthrough =>
            {
                tracing::warn!(%reason, "summarization unavailable; using truncated input");
                Ok(self.fallback_summary(text))
            }
            other => other,
        }
    }
}
