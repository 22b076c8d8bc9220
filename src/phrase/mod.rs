//! Keyphrase components
//!
//! RAKE ranking, candidate normalization, and the extractor that merges
//! phrases with named entities.

pub mod extraction;
pub mod normalize;
pub mod rake;
