//! Unit vector representation for sentences
//!
//! Builds sparse vectors over RAKE phrases: a sentence has a non-zero
//! dimension for every ranked phrase it contains, weighted by the phrase
//! score. Vectors are L2-normalized so cosine similarity is a dot product.

use rustc_hash::FxHashMap;

use crate::phrase::rake::RankedPhrase;

/// A sparse unit vector representation of a sentence
#[derive(Debug, Clone, Default)]
pub struct UnitVector {
    /// Non-zero dimensions: phrase key -> weight
    pub dimensions: FxHashMap<String, f64>,
    /// L2 norm before normalization
    pub norm: f64,
}

impl UnitVector {
    /// Create a new empty unit vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a map of dimensions
    pub fn from_dimensions(mut dimensions: FxHashMap<String, f64>) -> Self {
        let norm = Self::compute_norm(&dimensions);
        if norm > 0.0 {
            for value in dimensions.values_mut() {
                *value /= norm;
            }
        }
        Self { dimensions, norm }
    }

    fn compute_norm(dimensions: &FxHashMap<String, f64>) -> f64 {
        dimensions.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Cosine similarity with another vector
    pub fn cosine_similarity(&self, other: &UnitVector) -> f64 {
        // Iterate the smaller map.
        let (small, large) = if self.dimensions.len() <= other.dimensions.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .dimensions
            .iter()
            .filter_map(|(key, value)| large.dimensions.get(key).map(|o| value * o))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// One phrase dimension: its key, split into words, and its weight.
#[derive(Debug, Clone)]
struct Dimension {
    key: String,
    words: Vec<String>,
    score: f64,
}

/// Builds unit vectors for sentences from ranked phrases
#[derive(Debug, Clone)]
pub struct UnitVectorBuilder {
    dimensions: Vec<Dimension>,
    weight_by_score: bool,
}

impl UnitVectorBuilder {
    pub fn new(phrases: &[RankedPhrase]) -> Self {
        Self {
            dimensions: phrases
                .iter()
                .map(|p| Dimension {
                    key: p.key.clone(),
                    words: p.key.split(' ').map(str::to_string).collect(),
                    score: p.score,
                })
                .collect(),
            weight_by_score: true,
        }
    }

    /// Set whether to weight dimensions by phrase score
    pub fn with_score_weighting(mut self, weight: bool) -> Self {
        self.weight_by_score = weight;
        self
    }

    fn weight(&self, dim: &Dimension) -> f64 {
        if self.weight_by_score {
            dim.score
        } else {
            1.0
        }
    }

    /// Vector of a sentence given its lowercase words.
    ///
    /// A phrase counts once per sentence, however often it occurs.
    pub fn build_sentence_vector(&self, words: &[String]) -> UnitVector {
        let dimensions: FxHashMap<String, f64> = self
            .dimensions
            .iter()
            .filter(|dim| {
                !dim.words.is_empty()
                    && words
                        .windows(dim.words.len())
                        .any(|window| window == dim.words.as_slice())
            })
            .map(|dim| (dim.key.clone(), self.weight(dim)))
            .collect();

        UnitVector::from_dimensions(dimensions)
    }

    /// Vector of the whole document: every phrase at its weight.
    pub fn build_document_vector(&self) -> UnitVector {
        let dimensions: FxHashMap<String, f64> = self
            .dimensions
            .iter()
            .map(|dim| (dim.key.clone(), self.weight(dim)))
            .collect();

        UnitVector::from_dimensions(dimensions)
    }
}
