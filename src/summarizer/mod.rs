//! Summarization components
//!
//! The model boundary ([`model::SummaryModel`]), the request policy that
//! wraps it ([`policy::Summarizer`]), and a built-in extractive model that
//! selects diverse, relevant sentences with MMR.

pub mod extractive;
pub mod model;
pub mod policy;
pub mod unit_vector;
