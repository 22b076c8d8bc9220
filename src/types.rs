//! Core data types shared across pipeline stages.
//!
//! Everything here lives for a single request. [`CatalogRecord`] is the only
//! input owned elsewhere; scoring borrows it and never mutates it.

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, Result};

// ============================================================================
// Keyphrases
// ============================================================================

/// Where a candidate keyphrase came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyphraseSource {
    /// A named-entity span.
    Entity,
    /// A RAKE co-occurrence phrase.
    Phrase,
}

/// A normalized candidate keyphrase tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyphrase {
    pub text: String,
    pub source: KeyphraseSource,
}

impl Keyphrase {
    pub fn new(text: impl Into<String>, source: KeyphraseSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Ordered, deduplicated keyphrases, longest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyphraseSet {
    phrases: Vec<Keyphrase>,
}

impl KeyphraseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already ordered and deduplicated list.
    pub fn from_phrases(phrases: Vec<Keyphrase>) -> Self {
        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyphrase> {
        self.phrases.iter()
    }

    /// Keyphrase texts in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|p| p.text.as_str())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| p.text == text)
    }
}

impl<'a> IntoIterator for &'a KeyphraseSet {
    type Item = &'a Keyphrase;
    type IntoIter = std::slice::Iter<'a, Keyphrase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phrases.iter()
    }
}

// ============================================================================
// Summary
// ============================================================================

/// How a [`Summary`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// Input was below the word threshold and returned verbatim.
    Passthrough,
    /// Output of the summarization model.
    Generated,
    /// The model was unavailable; the truncated input stands in.
    Fallback,
}

/// A short summary of the request text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub kind: SummaryKind,
}

impl Summary {
    pub fn passthrough(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SummaryKind::Passthrough,
        }
    }

    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SummaryKind::Generated,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SummaryKind::Fallback,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// One book as supplied by the catalog collaborator.
///
/// All fields are optional so loosely-typed rows deserialize; the four text
/// fields read as `""` when absent and only `id` is required to be scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    #[serde(alias = "bookId")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub genres: Option<String>,
    pub characters: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    #[serde(alias = "coverImg", alias = "coverImageUrl")]
    pub cover_image_url: Option<String>,
}

impl CatalogRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    pub fn with_characters(mut self, characters: impl Into<String>) -> Self {
        self.characters = Some(characters.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn genres(&self) -> &str {
        self.genres.as_deref().unwrap_or("")
    }

    pub fn characters(&self) -> &str {
        self.characters.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Check the fields scoring depends on beyond the four text fields.
    ///
    /// `index` is the record's position in the catalog, used in the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(()),
            Some(_) => Err(PipelineError::MalformedCatalogRecord {
                index,
                reason: "blank id".into(),
            }),
            None => Err(PipelineError::MalformedCatalogRecord {
                index,
                reason: "missing id".into(),
            }),
        }
    }
}

// ============================================================================
// Scores
// ============================================================================

/// Per-field partial-ratio scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FieldScores {
    pub title: f64,
    pub genres: f64,
    pub characters: f64,
    pub description: f64,
}

impl FieldScores {
    /// Unweighted mean of the four fields.
    pub fn mean(&self) -> f64 {
        (self.title + self.genres + self.characters + self.description) / 4.0
    }
}

/// A catalog record paired with its relevance for one request.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord<'a> {
    pub record: &'a CatalogRecord,
    pub fields: FieldScores,
    pub relevance_score: f64,
}

/// Top-K scored records, sorted by descending relevance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedResult<'a> {
    records: Vec<ScoredRecord<'a>>,
}

impl<'a> RankedResult<'a> {
    pub fn new(records: Vec<ScoredRecord<'a>>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredRecord<'a>> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ScoredRecord<'a>> {
        self.records.get(index)
    }

    /// Record ids in rank order.
    pub fn ids(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.record.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyphrase_word_count() {
        let kp = Keyphrase::new("Lord of the  Rings", KeyphraseSource::Entity);
        assert_eq!(kp.word_count(), 4);
        assert_eq!(Keyphrase::new("", KeyphraseSource::Phrase).word_count(), 0);
    }

    #[test]
    fn test_keyphrase_set_accessors() {
        let set = KeyphraseSet::from_phrases(vec![
            Keyphrase::new("hobbit named Frodo", KeyphraseSource::Phrase),
            Keyphrase::new("Frodo Baggins", KeyphraseSource::Entity),
        ]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("Frodo Baggins"));
        assert!(!set.contains("frodo baggins"));
        assert_eq!(
            set.texts().collect::<Vec<_>>(),
            vec!["hobbit named Frodo", "Frodo Baggins"]
        );
    }

    #[test]
    fn test_absent_fields_read_as_empty() {
        let record = CatalogRecord::new("1");
        assert_eq!(record.title(), "");
        assert_eq!(record.genres(), "");
        assert_eq!(record.characters(), "");
        assert_eq!(record.description(), "");
    }

    #[test]
    fn test_validate_requires_id() {
        assert!(CatalogRecord::new("42").validate(0).is_ok());

        let missing = CatalogRecord::default();
        let err = missing.validate(7).unwrap_err();
        assert!(err.to_string().contains("index 7"));
        assert!(err.to_string().contains("missing id"));

        let blank = CatalogRecord::new("   ");
        assert!(blank.validate(0).unwrap_err().to_string().contains("blank id"));
    }

    #[test]
    fn test_deserialize_dataset_row() {
        let json = r#"{
            "bookId": "2767052-the-hunger-games",
            "title": "The Hunger Games",
            "genres": "Young Adult, Fiction, Dystopia",
            "characters": null,
            "coverImg": "https://example.com/cover.jpg",
            "rating": 4.33
        }"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id(), "2767052-the-hunger-games");
        assert_eq!(record.title(), "The Hunger Games");
        assert_eq!(record.characters(), "");
        assert_eq!(record.description(), "");
        assert_eq!(record.rating, Some(4.33));
        assert_eq!(
            record.cover_image_url.as_deref(),
            Some("https://example.com/cover.jpg")
        );
    }

    #[test]
    fn test_field_scores_mean() {
        let scores = FieldScores {
            title: 100.0,
            genres: 50.0,
            characters: 0.0,
            description: 50.0,
        };
        assert!((scores.mean() - 50.0).abs() < f64::EPSILON);
        assert_eq!(FieldScores::default().mean(), 0.0);
    }

    #[test]
    fn test_summary_constructors() {
        assert_eq!(Summary::passthrough("ok").kind, SummaryKind::Passthrough);
        assert_eq!(Summary::generated("x").kind, SummaryKind::Generated);
        assert_eq!(Summary::fallback("y").kind, SummaryKind::Fallback);
        assert!(Summary::passthrough("").is_empty());
    }
}
