//! Built-in extractive summarization model
//!
//! Selects whole sentences by Maximal Marginal Relevance (MMR) over RAKE
//! phrase vectors, then returns them in document order. It satisfies the
//! [`SummaryModel`] contract without any external weights: the output is
//! shorter than the input and bounded by `[min_length, max_length]` words.

use std::future::Future;

use super::model::{GenerationParams, SummaryModel};
use super::unit_vector::{UnitVector, UnitVectorBuilder};
use crate::config::PhraseBounds;
use crate::errors::Result;
use crate::nlp::tokenizer::tokenize;
use crate::phrase::rake::RakeRanker;

/// A sentence of the prompt.
#[derive(Debug, Clone)]
struct SentenceSpan<'a> {
    /// Position in the document
    index: usize,
    /// Source text, trailing punctuation included
    text: &'a str,
    /// Lowercase words
    words: Vec<String>,
}

/// Split `text` into sentences using the tokenizer's sentence indices.
fn split_sentences(text: &str) -> Vec<SentenceSpan<'_>> {
    let tokens = tokenize(text);
    let mut sentences: Vec<SentenceSpan<'_>> = Vec::new();
    let mut starts: Vec<usize> = Vec::new();

    for token in &tokens {
        match sentences.last_mut() {
            Some(last) if last.index == token.sentence_idx => last.words.push(token.lowercase()),
            _ => {
                starts.push(token.start);
                sentences.push(SentenceSpan {
                    index: token.sentence_idx,
                    text: "",
                    words: vec![token.lowercase()],
                });
            }
        }
    }

    for (i, sentence) in sentences.iter_mut().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        sentence.text = text[starts[i]..end].trim();
    }

    sentences
}

/// MMR sentence-extraction model
#[derive(Debug, Clone)]
pub struct ExtractiveModel {
    rake: RakeRanker,
    /// 0 = diversity only, 1 = relevance only
    lambda: f64,
}

impl Default for ExtractiveModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractiveModel {
    pub fn new() -> Self {
        Self {
            rake: RakeRanker::new(),
            lambda: 0.7,
        }
    }

    /// Set lambda (relevance vs diversity tradeoff)
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda.clamp(0.0, 1.0);
        self
    }

    /// Summarize synchronously.
    ///
    /// MMR: `λ * sim(s, doc) - (1-λ) * max_{s' ∈ selected} sim(s, s')`.
    /// Sentences are added until the summary reaches `min_length` words;
    /// a sentence that would push it past `max_length` is skipped.
    pub fn summarize(&self, text: &str, params: &GenerationParams) -> String {
        let sentences = split_sentences(text);
        if sentences.is_empty() || params.max_length == 0 {
            return String::new();
        }

        let phrases = self.rake.rank(text, PhraseBounds::default());
        let builder = UnitVectorBuilder::new(&phrases);
        let doc_vector = builder.build_document_vector();

        let vectors: Vec<UnitVector> = sentences
            .iter()
            .map(|s| builder.build_sentence_vector(&s.words))
            .collect();
        let relevance: Vec<f64> = vectors
            .iter()
            .map(|v| v.cosine_similarity(&doc_vector))
            .collect();

        let mut selected: Vec<usize> = Vec::new();
        let mut total_words = 0;

        while total_words < params.min_length.max(1) {
            let mut best: Option<(usize, f64)> = None;

            for i in 0..sentences.len() {
                if selected.contains(&i) {
                    continue;
                }
                let fits = total_words + sentences[i].words.len() <= params.max_length;
                if !fits && !selected.is_empty() {
                    continue;
                }

                let max_sim = selected
                    .iter()
                    .map(|&j| vectors[i].cosine_similarity(&vectors[j]))
                    .fold(0.0, f64::max);
                let mmr = self.lambda * relevance[i] - (1.0 - self.lambda) * max_sim;

                if best.map_or(true, |(_, score)| mmr > score) {
                    best = Some((i, mmr));
                }
            }

            let Some((idx, _)) = best else { break };
            total_words += sentences[idx].words.len();
            selected.push(idx);
        }

        selected.sort_by_key(|&i| sentences[i].index);

        let summary = selected
            .iter()
            .map(|&i| sentences[i].text)
            .collect::<Vec<_>>()
            .join(" ");

        // A single oversized sentence is cut at the word limit.
        if total_words > params.max_length {
            summary
                .split_whitespace()
                .take(params.max_length)
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            summary
        }
    }
}

impl SummaryModel for ExtractiveModel {
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String>> + Send {
        async move { Ok(self.summarize(prompt, params)) }
    }
}
