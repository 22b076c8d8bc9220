//! Candidate normalization and deduplication
//!
//! A candidate's canonical form drops every character that is neither
//! alphanumeric nor whitespace, collapses whitespace runs to one space and
//! trims. Two candidates are duplicates iff their canonical forms are equal.
//! Comparison is case-sensitive: "Frodo Baggins" and "frodo baggins" are
//! distinct.

use rustc_hash::FxHashSet;

use crate::types::Keyphrase;

/// Canonical form of one candidate, or `None` if nothing survives stripping.
pub fn canonical_form(candidate: &str) -> Option<String> {
    let stripped: String = candidate
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let canonical = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    (!canonical.is_empty()).then_some(canonical)
}

/// Order-preserving, first-occurrence-wins candidate normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize and deduplicate plain strings.
    pub fn normalize<I, S>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        candidates
            .into_iter()
            .filter_map(|c| canonical_form(c.as_ref()))
            .filter(|form| seen.insert(form.clone()))
            .collect()
    }

    /// Normalize and deduplicate tagged keyphrases, keeping the source tag of
    /// the first occurrence.
    pub fn normalize_keyphrases(&self, candidates: Vec<Keyphrase>) -> Vec<Keyphrase> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        candidates
            .into_iter()
            .filter_map(|kp| canonical_form(&kp.text).map(|text| Keyphrase::new(text, kp.source)))
            .filter(|kp| seen.insert(kp.text.clone()))
            .collect()
    }
}
