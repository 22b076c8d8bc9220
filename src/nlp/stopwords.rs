//! Stopword filtering
//!
//! English stopwords from the `stop-words` crate (NLTK list), optionally
//! extended with caller-supplied words. RAKE splits candidate phrases on
//! these, so the list must stay free of content words like "ring" or "world".

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// A filter for recognizing stopwords
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase)
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordFilter {
    /// Create a filter with the English stopword list
    pub fn english() -> Self {
        Self {
            stopwords: get(LANGUAGE::English)
                .into_iter()
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    /// Check if a word is a stopword (case-insensitive)
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_stopwords() {
        let filter = StopwordFilter::english();

        assert!(filter.is_stopword("the"));
        assert!(filter.is_stopword("The")); // case insensitive
        assert!(filter.is_stopword("is"));
        assert!(filter.is_stopword("a"));
        assert!(!filter.is_stopword("hobbit"));
        assert!(!filter.is_stopword("dragon"));
        assert!(!filter.is_stopword(""));
    }

    #[test]
    fn test_english_keeps_content_words() {
        let filter = StopwordFilter::english();
        for word in ["ring", "man", "world", "end", "new", "great", "young", "one"] {
            assert!(!filter.is_stopword(word), "{word} must not be a stopword");
        }
    }

    #[test]
    fn test_custom_stopwords() {
        let mut filter = StopwordFilter::from_list(&["custom", "words"]);

        assert!(filter.is_stopword("custom"));
        assert!(filter.is_stopword("Words"));
        assert!(!filter.is_stopword("the"));

        filter.add_stopwords(&["extra"]);
        assert!(filter.is_stopword("Extra"));
    }

    #[test]
    fn test_add_owned_stopwords() {
        let mut filter = StopwordFilter::empty();
        filter.add_stopwords(&["Book".to_string(), "novel".to_string()]);
        assert!(filter.is_stopword("book"));
        assert!(filter.is_stopword("NOVEL"));
        assert!(!filter.is_stopword("the"));
    }

    #[test]
    fn test_empty_filter() {
        let filter = StopwordFilter::empty();

        assert!(!filter.is_stopword("the"));
        assert!(!filter.is_stopword("a"));
        assert!(!filter.is_stopword(""));
    }
}
