//! Collection-wide statistics.

use serde::{Deserialize, Serialize};

/// Aggregate statistics over the whole collection.
///
/// Inputs to weighting models; the matching engines never interpret these
/// themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStatistics {
    documents: u64,
    unique_terms: u64,
    tokens: u64,
}

impl CollectionStatistics {
    /// Create statistics from raw counts.
    pub fn new(documents: u64, unique_terms: u64, tokens: u64) -> Self {
        CollectionStatistics {
            documents,
            unique_terms,
            tokens,
        }
    }

    /// Number of documents in the collection.
    pub fn number_of_documents(&self) -> u64 {
        self.documents
    }

    /// Number of unique terms in the lexicon.
    pub fn number_of_unique_terms(&self) -> u64 {
        self.unique_terms
    }

    /// Total number of tokens across all documents.
    pub fn number_of_tokens(&self) -> u64 {
        self.tokens
    }

    /// Average document length in tokens.
    pub fn average_document_length(&self) -> f64 {
        if self.documents == 0 {
            0.0
        } else {
            self.tokens as f64 / self.documents as f64
        }
    }
}
