//! Named-entity recognition boundary
//!
//! [`EntityRecognizer`] is the seam where an external NER capability plugs
//! in. Labels follow the OntoNotes set that most NER models emit, so a
//! recognizer only has to map its own label strings through
//! [`EntityLabel::from_label`].
//!
//! [`HeuristicRecognizer`] is a rule-based default for running without an
//! external model: capitalized spans (with `of`/`the`/`and` connectors),
//! years and month-day dates.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use super::stopwords::StopwordFilter;
use super::tokenizer::{tokenize, Token};

// ============================================================================
// Labels and spans
// ============================================================================

/// Entity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Person,
    Norp,
    Fac,
    #[serde(rename = "ORG")]
    Organization,
    Gpe,
    #[serde(rename = "LOC")]
    Location,
    Product,
    Event,
    WorkOfArt,
    Law,
    Language,
    Date,
    Time,
    Percent,
    Money,
    Quantity,
    Ordinal,
    Cardinal,
    Misc,
}

impl EntityLabel {
    /// Parse a label string such as `"PERSON"`, `"ORG"` or `"work_of_art"`.
    ///
    /// Unknown labels map to [`EntityLabel::Misc`].
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_uppercase().as_str() {
            "PERSON" | "PER" => Self::Person,
            "NORP" => Self::Norp,
            "FAC" => Self::Fac,
            "ORG" | "ORGANIZATION" => Self::Organization,
            "GPE" => Self::Gpe,
            "LOC" | "LOCATION" => Self::Location,
            "PRODUCT" => Self::Product,
            "EVENT" => Self::Event,
            "WORK_OF_ART" => Self::WorkOfArt,
            "LAW" => Self::Law,
            "LANGUAGE" => Self::Language,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "PERCENT" => Self::Percent,
            "MONEY" => Self::Money,
            "QUANTITY" => Self::Quantity,
            "ORDINAL" => Self::Ordinal,
            "CARDINAL" => Self::Cardinal,
            _ => Self::Misc,
        }
    }

    /// Whether entities of this category become keyphrase candidates.
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            Self::Person
                | Self::Organization
                | Self::Gpe
                | Self::Location
                | Self::Product
                | Self::Date
                | Self::Time
                | Self::Money
                | Self::Percent
                | Self::Quantity
                | Self::Event
                | Self::WorkOfArt
        )
    }
}

/// One recognized entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Surface form as it appears in the text
    pub text: String,
    pub label: EntityLabel,
    /// Byte offsets into the recognized text
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: EntityLabel, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label,
            start,
            end,
        }
    }
}

// ============================================================================
// Recognizer trait
// ============================================================================

/// A named-entity recognition capability.
///
/// Implementations must be `Send + Sync`: one recognizer is shared by every
/// request a pipeline serves.
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entity spans in `text`, in document order.
    fn recognize(&self, text: &str) -> Vec<EntitySpan>;
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for &R {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        (**self).recognize(text)
    }
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for Arc<R> {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        (**self).recognize(text)
    }
}

impl<R: EntityRecognizer + ?Sized> EntityRecognizer for Box<R> {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        (**self).recognize(text)
    }
}

/// Recognizer that finds nothing. Keyphrases then come from RAKE alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    #[inline]
    fn recognize(&self, _text: &str) -> Vec<EntitySpan> {
        Vec::new()
    }
}

// ============================================================================
// Lazy shared handle
// ============================================================================

/// Shared handle to a recognizer that is built on first use.
///
/// Cloning the handle is cheap; all clones share one instance. Loading a
/// real NER model is expensive, so the loader runs at most once and only
/// when a request actually needs it.
pub struct LazyRecognizer<R> {
    cell: Arc<OnceLock<R>>,
    init: Arc<dyn Fn() -> R + Send + Sync>,
}

impl<R> LazyRecognizer<R> {
    pub fn new(init: impl Fn() -> R + Send + Sync + 'static) -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
            init: Arc::new(init),
        }
    }

    /// Get the recognizer, building it if needed.
    pub fn get(&self) -> &R {
        self.cell.get_or_init(|| (self.init)())
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<R> Clone for LazyRecognizer<R> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            init: Arc::clone(&self.init),
        }
    }
}

impl<R> std::fmt::Debug for LazyRecognizer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRecognizer")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl<R: EntityRecognizer> EntityRecognizer for LazyRecognizer<R> {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        self.get().recognize(text)
    }
}

// ============================================================================
// Heuristic recognizer
// ============================================================================

const CONNECTORS: &[&str] = &["of", "the", "and", "de", "van", "von", "la", "le", "du"];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const ORG_SUFFIXES: &[&str] = &[
    "inc", "corp", "ltd", "llc", "company", "university", "press", "society", "council",
];

/// Rule-based recognizer for English text.
///
/// Pattern: `Cap (connector* Cap)*` within one sentence and without a
/// punctuation break. Stopwords never start a span, so a sentence-initial
/// "The" is dropped from "The Lord of the Rings".
#[derive(Debug, Clone)]
pub struct HeuristicRecognizer {
    stopwords: StopwordFilter,
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicRecognizer {
    pub fn new() -> Self {
        Self {
            stopwords: StopwordFilter::english(),
        }
    }

    pub fn with_stopwords(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    fn is_connector(token: &Token<'_>) -> bool {
        let lower = token.lowercase();
        CONNECTORS.contains(&lower.as_str())
    }

    fn is_month(token: &Token<'_>) -> bool {
        let lower = token.lowercase();
        MONTHS.contains(&lower.as_str())
    }

    fn is_year(token: &Token<'_>) -> bool {
        token.is_numeric()
            && token.text.len() == 4
            && token
                .text
                .parse::<u32>()
                .is_ok_and(|year| (1000..=2100).contains(&year))
    }

    fn is_day(token: &Token<'_>) -> bool {
        token.is_numeric()
            && token
                .text
                .parse::<u32>()
                .is_ok_and(|day| (1..=31).contains(&day))
    }

    fn starts_span(&self, token: &Token<'_>) -> bool {
        token.is_capitalized() && !self.stopwords.is_stopword(token.text)
    }

    fn continues(prev: &Token<'_>, next: &Token<'_>) -> bool {
        next.sentence_idx == prev.sentence_idx && !next.boundary_before
    }

    /// Match `Month day? year?` starting at `start`, returning the end index.
    fn match_date(tokens: &[Token<'_>], start: usize) -> Option<usize> {
        if !Self::is_month(&tokens[start]) || !tokens[start].is_capitalized() {
            return None;
        }
        let mut end = start + 1;
        if end < tokens.len()
            && Self::continues(&tokens[end - 1], &tokens[end])
            && Self::is_day(&tokens[end])
        {
            end += 1;
        }
        // A following year may sit behind a comma ("March 3, 1954").
        if end < tokens.len()
            && tokens[end].sentence_idx == tokens[start].sentence_idx
            && Self::is_year(&tokens[end])
        {
            end += 1;
        }
        (end > start + 1).then_some(end)
    }

    /// Match a capitalized span starting at `start`, returning the end index.
    fn match_proper(&self, tokens: &[Token<'_>], start: usize) -> Option<usize> {
        if !self.starts_span(&tokens[start]) {
            return None;
        }
        let mut end = start + 1;
        let mut probe = end;
        while probe < tokens.len() && Self::continues(&tokens[probe - 1], &tokens[probe]) {
            let token = &tokens[probe];
            if token.is_capitalized() && !Self::is_connector(token) {
                probe += 1;
                end = probe;
            } else if Self::is_connector(token) {
                probe += 1;
            } else {
                break;
            }
        }
        Some(end)
    }

    fn label_for(tokens: &[Token<'_>]) -> EntityLabel {
        let has_connector = tokens.iter().any(Self::is_connector);
        let last = tokens
            .last()
            .map(Token::lowercase)
            .unwrap_or_default();
        if ORG_SUFFIXES.contains(&last.as_str()) {
            EntityLabel::Organization
        } else if has_connector {
            EntityLabel::WorkOfArt
        } else if tokens.len() > 1 {
            EntityLabel::Person
        } else {
            EntityLabel::Misc
        }
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str) -> Vec<EntitySpan> {
        let tokens = tokenize(text);
        let mut spans = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let (end, label) = if let Some(end) = Self::match_date(&tokens, i) {
                (end, EntityLabel::Date)
            } else if Self::is_year(&tokens[i]) {
                (i + 1, EntityLabel::Date)
            } else if let Some(end) = self.match_proper(&tokens, i) {
                (end, Self::label_for(&tokens[i..end]))
            } else {
                i += 1;
                continue;
            };

            let (start_byte, end_byte) = (tokens[i].start, tokens[end - 1].end);
            spans.push(EntitySpan::new(
                &text[start_byte..end_byte],
                label,
                start_byte,
                end_byte,
            ));
            i = end;
        }

        spans
    }
}
