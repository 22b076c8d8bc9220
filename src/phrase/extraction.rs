//! Keyphrase extraction
//!
//! Combines named entities with RAKE phrases into one [`KeyphraseSet`]:
//!
//! 1. Entities in the allowed categories, distinct by surface form
//! 2. RAKE phrases within the word bounds, in rank order
//! 3. Union on exact string equality (entities first)
//! 4. Drop candidates whose canonical form has at most one word
//! 5. Normalize and deduplicate ([`Normalizer`])
//! 6. Stable sort by descending word count, truncate to `top_n`

use rustc_hash::FxHashSet;

use crate::config::{ExtractorConfig, PhraseBounds};
use crate::errors::Result;
use crate::nlp::entities::EntityRecognizer;
use crate::nlp::stopwords::StopwordFilter;
use crate::phrase::normalize::{canonical_form, Normalizer};
use crate::phrase::rake::RakeRanker;
use crate::types::{Keyphrase, KeyphraseSet, KeyphraseSource};

/// Candidates with this many words or fewer are too generic to keep.
const MAX_GENERIC_WORDS: usize = 1;

/// Entity + RAKE keyphrase extractor.
#[derive(Debug, Clone)]
pub struct KeyphraseExtractor<R> {
    recognizer: R,
    rake: RakeRanker,
    normalizer: Normalizer,
    bounds: PhraseBounds,
    top_n: usize,
}

impl<R: EntityRecognizer> KeyphraseExtractor<R> {
    /// Build an extractor with default settings.
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            rake: RakeRanker::new(),
            normalizer: Normalizer::new(),
            bounds: PhraseBounds::default(),
            top_n: ExtractorConfig::default().top_n,
        }
    }

    /// Build an extractor from validated configuration.
    pub fn from_config(recognizer: R, config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let mut stopwords = StopwordFilter::english();
        stopwords.add_stopwords(&config.extra_stopwords);
        Ok(Self {
            recognizer,
            rake: RakeRanker::with_stopwords(stopwords),
            normalizer: Normalizer::new(),
            bounds: config.phrase_bounds()?,
            top_n: config.top_n,
        })
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn bounds(&self) -> PhraseBounds {
        self.bounds
    }

    /// Extract with the configured bounds and `top_n`.
    pub fn extract_default(&self, text: &str) -> KeyphraseSet {
        self.extract(text, self.bounds, self.top_n)
    }

    /// Extract up to `top_n` keyphrases from `text`.
    ///
    /// Empty or whitespace-only text yields an empty set. Long text is
    /// processed in full.
    pub fn extract(&self, text: &str, bounds: PhraseBounds, top_n: usize) -> KeyphraseSet {
        if text.trim().is_empty() || top_n == 0 {
            return KeyphraseSet::new();
        }

        let entities = self.entity_candidates(text);
        let phrases = self
            .rake
            .rank(text, bounds)
            .into_iter()
            .map(|p| Keyphrase::new(p.text, KeyphraseSource::Phrase));

        // Union on exact surface form; an entity shadows an equal phrase.
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let union: Vec<Keyphrase> = entities
            .into_iter()
            .chain(phrases)
            .filter(|kp| seen.insert(kp.text.clone()))
            .collect();
        let union_len = union.len();

        let specific: Vec<Keyphrase> = union
            .into_iter()
            .filter(|kp| {
                canonical_form(&kp.text)
                    .is_some_and(|form| form.split(' ').count() > MAX_GENERIC_WORDS)
            })
            .collect();

        let mut candidates = self.normalizer.normalize_keyphrases(specific);
        candidates.sort_by_key(|kp| std::cmp::Reverse(kp.word_count()));
        candidates.truncate(top_n);

        tracing::debug!(
            candidates = union_len,
            kept = candidates.len(),
            "keyphrase extraction finished"
        );

        KeyphraseSet::from_phrases(candidates)
    }

    fn entity_candidates(&self, text: &str) -> Vec<Keyphrase> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        self.recognizer
            .recognize(text)
            .into_iter()
            .filter(|span| span.label.is_allowed())
            .filter(|span| seen.insert(span.text.clone()))
            .map(|span| Keyphrase::new(span.text, KeyphraseSource::Entity))
            .collect()
    }
}
