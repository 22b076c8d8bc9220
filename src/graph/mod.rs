//! Graph data structures
//!
//! This module provides the word co-occurrence graph RAKE scores against.

pub mod cooccurrence;
