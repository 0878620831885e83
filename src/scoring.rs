//! Term weighting models.
//!
//! A weighting model is a pure function from one posting's statistics to a
//! relevance score contribution. The matching engines call it once per
//! (document, query slot) pair and sum the results; they never interpret the
//! numbers themselves. Per-term query weights are applied by the engines, not
//! by the models.

pub mod models;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::structures::{CollectionStatistics, LexiconEntry};

pub use models::{Bm25, Dlh, TfIdf};

/// Configuration for scoring algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// K1 parameter for BM25 (term frequency saturation).
    pub k1: f64,

    /// B parameter for BM25 (document length normalization).
    pub b: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig { k1: 1.2, b: 0.75 }
    }
}

/// A term weighting model.
///
/// Implementations must be pure: given the same inputs, `score` returns the
/// same value, with no interior state. That is what lets TAAT and DAAT
/// produce identical scores for a document regardless of traversal order.
pub trait WeightingModel: Send + Sync + Debug {
    /// Model name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Score one posting.
    ///
    /// # Arguments
    ///
    /// * `frequency` - term frequency within the document (summed across a
    ///   synonym group's members)
    /// * `doc_length` - document length in tokens
    /// * `term` - per-term statistics (a statistics override, when set, is
    ///   passed here verbatim)
    /// * `collection` - collection-wide statistics
    fn score(
        &self,
        frequency: f64,
        doc_length: f64,
        term: &LexiconEntry,
        collection: &CollectionStatistics,
    ) -> f64;
}
