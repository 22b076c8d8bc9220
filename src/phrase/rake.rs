//! RAKE keyphrase ranking
//!
//! Rapid Automatic Keyword Extraction: candidate phrases are maximal runs of
//! non-stopword tokens, split additionally at punctuation and sentence
//! boundaries. Each word is scored by `degree / frequency` over the
//! co-occurrence graph of all candidates, and a phrase scores the sum of its
//! word scores.

use rustc_hash::FxHashMap;

use crate::config::PhraseBounds;
use crate::graph::cooccurrence::CooccurrenceGraph;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::{tokenize, Token};

/// A ranked RAKE phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPhrase {
    /// Surface form of the first occurrence, words joined by single spaces
    pub text: String,
    /// Lowercase form used for deduplication and scoring
    pub key: String,
    pub score: f64,
    /// Number of occurrences in the text
    pub count: usize,
}

impl RankedPhrase {
    pub fn word_count(&self) -> usize {
        self.key.split(' ').count()
    }
}

/// RAKE ranker
#[derive(Debug, Clone, Default)]
pub struct RakeRanker {
    stopwords: StopwordFilter,
}

impl RakeRanker {
    /// Create a ranker with the English stopword list
    pub fn new() -> Self {
        Self {
            stopwords: StopwordFilter::english(),
        }
    }

    /// Create a ranker with a custom stopword filter
    pub fn with_stopwords(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Split tokens into candidate phrases (before length bounds).
    fn candidate_runs<'t, 'a>(&self, tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            let breaks_run = token.boundary_before
                || start.is_some_and(|s| tokens[s].sentence_idx != token.sentence_idx);
            if breaks_run {
                if let Some(s) = start.take() {
                    runs.push(&tokens[s..i]);
                }
            }

            if self.stopwords.is_stopword(token.text) {
                if let Some(s) = start.take() {
                    runs.push(&tokens[s..i]);
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            runs.push(&tokens[s..]);
        }

        runs
    }

    /// Rank the candidate phrases of `text`.
    ///
    /// Phrases outside `bounds` are dropped, not split. The result is sorted
    /// by descending score; ties keep first-occurrence order. Duplicate
    /// phrases (case-insensitive) appear once, with their first surface form.
    pub fn rank(&self, text: &str, bounds: PhraseBounds) -> Vec<RankedPhrase> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Vec::new();
        }

        let runs: Vec<_> = self
            .candidate_runs(&tokens)
            .into_iter()
            .filter(|run| bounds.contains(run.len()))
            .collect();

        let mut graph = CooccurrenceGraph::with_capacity(tokens.len());
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut phrases: Vec<RankedPhrase> = Vec::new();

        for run in &runs {
            let words: Vec<String> = run.iter().map(Token::lowercase).collect();
            graph.add_phrase(&words);

            let key = words.join(" ");
            if let Some(&at) = index.get(&key) {
                phrases[at].count += 1;
                continue;
            }
            index.insert(key.clone(), phrases.len());
            phrases.push(RankedPhrase {
                text: run.iter().map(|t| t.text).collect::<Vec<_>>().join(" "),
                key,
                score: 0.0,
                count: 1,
            });
        }

        for phrase in &mut phrases {
            phrase.score = phrase.key.split(' ').map(|w| graph.word_score(w)).sum();
        }

        // Stable sort: equal scores keep first-occurrence order.
        phrases.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        phrases
    }
}
