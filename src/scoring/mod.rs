//! Catalog relevance scoring
//!
//! Fuzzy partial-ratio matching and the multi-field scorer built on it.

pub mod partial_ratio;
pub mod scorer;
