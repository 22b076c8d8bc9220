//! Error types for the ranking pipeline.
//!
//! Empty input is deliberately not an error: extraction, summarization and
//! scoring all return empty outputs for it.

/// Errors raised by pipeline construction and execution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The summarization capability timed out, failed to load, or errored.
    #[error("summarization unavailable: {0}")]
    SummarizationUnavailable(String),

    /// A catalog record lacks a field the pipeline requires (e.g. its id).
    #[error("malformed catalog record at index {index}: {reason}")]
    MalformedCatalogRecord { index: usize, reason: String },

    /// Invalid pipeline or per-request configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error reported by an external model capability.
    #[error("model error: {0}")]
    Model(String),
}

/// Convenience type alias for pipeline results.
pub type Result<T> = std::result::Result<T, PipelineError>;
