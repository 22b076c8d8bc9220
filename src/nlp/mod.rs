//! Natural Language Processing components
//!
//! This module provides tokenization, stopword filtering and the
//! named-entity recognition boundary.

pub mod entities;
pub mod stopwords;
pub mod tokenizer;
