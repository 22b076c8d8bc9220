//! Relevance scoring
//!
//! Every catalog record gets four field scores:
//!
//! | Field | Score |
//! |-------|-------|
//! | title, genres, characters | max `partial_ratio` over all keyphrases (0 if none) |
//! | description | `partial_ratio(summary, description)` |
//!
//! and a `relevance_score` equal to their unweighted mean. Records are
//! ranked by descending relevance; equal scores keep catalog order.
//!
//! Scoring borrows the catalog and builds a per-request list of
//! [`ScoredRecord`]s, so concurrent requests over one shared catalog never
//! touch each other's scores.

use rayon::prelude::*;

use super::partial_ratio::partial_ratio;
use crate::config::ScorerConfig;
use crate::types::{CatalogRecord, FieldScores, KeyphraseSet, RankedResult, ScoredRecord, Summary};

/// Scores and ranks catalog records against one request's signal.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    parallel_threshold: usize,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::from_config(&ScorerConfig::default())
    }
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ScorerConfig) -> Self {
        Self {
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Catalog size at which records are scored on the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Field scores of a single record.
    pub fn score_fields(
        &self,
        keyphrases: &KeyphraseSet,
        summary: &Summary,
        record: &CatalogRecord,
    ) -> FieldScores {
        let best = |field: &str| {
            keyphrases
                .texts()
                .map(|kp| partial_ratio(kp, field))
                .fold(0.0, f64::max)
        };

        FieldScores {
            title: best(record.title()),
            genres: best(record.genres()),
            characters: best(record.characters()),
            description: partial_ratio(summary.as_str(), record.description()),
        }
    }

    fn score_one<'a>(
        &self,
        keyphrases: &KeyphraseSet,
        summary: &Summary,
        index: usize,
        record: &'a CatalogRecord,
    ) -> Option<ScoredRecord<'a>> {
        if let Err(err) = record.validate(index) {
            tracing::warn!(%err, "skipping catalog record");
            return None;
        }
        let fields = self.score_fields(keyphrases, summary, record);
        Some(ScoredRecord {
            record,
            fields,
            relevance_score: fields.mean(),
        })
    }

    /// Score `catalog` and return the `top_k` most relevant records.
    ///
    /// Malformed records (no usable id) are skipped with a warning. An
    /// empty catalog yields an empty result.
    pub fn score<'a>(
        &self,
        keyphrases: &KeyphraseSet,
        summary: &Summary,
        catalog: &'a [CatalogRecord],
        top_k: usize,
    ) -> RankedResult<'a> {
        if catalog.is_empty() || top_k == 0 {
            return RankedResult::empty();
        }

        // Both paths preserve catalog order, which the stable sort relies on.
        let mut scored: Vec<ScoredRecord<'a>> = if catalog.len() >= self.parallel_threshold {
            catalog
                .par_iter()
                .enumerate()
                .filter_map(|(i, record)| self.score_one(keyphrases, summary, i, record))
                .collect()
        } else {
            catalog
                .iter()
                .enumerate()
                .filter_map(|(i, record)| self.score_one(keyphrases, summary, i, record))
                .collect()
        };
        let scored_len = scored.len();

        scored.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        tracing::debug!(
            catalog = catalog.len(),
            scored = scored_len,
            returned = scored.len(),
            "catalog scored"
        );

        RankedResult::new(scored)
    }
}
