//! Concrete weighting models: BM25, TF-IDF, and DLH.

use std::f64::consts::PI;

use crate::scoring::{ScoringConfig, WeightingModel};
use crate::structures::{CollectionStatistics, LexiconEntry};

/// BM25 probabilistic ranking function.
///
/// Uses the smoothed `ln(1 + ...)` idf form, which stays positive even when
/// a term (or a synonym group's merged statistics) approaches collection-wide
/// document frequency.
#[derive(Debug, Clone, Default)]
pub struct Bm25 {
    config: ScoringConfig,
}

impl Bm25 {
    /// Create a BM25 model with the given parameters.
    pub fn new(config: ScoringConfig) -> Self {
        Bm25 { config }
    }
}

impl WeightingModel for Bm25 {
    fn name(&self) -> &str {
        "BM25"
    }

    fn score(
        &self,
        frequency: f64,
        doc_length: f64,
        term: &LexiconEntry,
        collection: &CollectionStatistics,
    ) -> f64 {
        if frequency <= 0.0 {
            return 0.0;
        }
        let documents = collection.number_of_documents() as f64;
        let doc_frequency = term.doc_frequency() as f64;
        let idf = (1.0 + (documents - doc_frequency + 0.5) / (doc_frequency + 0.5)).ln();

        let average_length = collection.average_document_length();
        let norm = if average_length > 0.0 {
            doc_length / average_length
        } else {
            1.0
        };
        let tf_component = (frequency * (self.config.k1 + 1.0))
            / (frequency + self.config.k1 * (1.0 - self.config.b + self.config.b * norm));

        idf * tf_component
    }
}

/// TF-IDF with logarithmic term-frequency scaling and length normalization.
#[derive(Debug, Clone, Default)]
pub struct TfIdf;

impl WeightingModel for TfIdf {
    fn name(&self) -> &str {
        "TF-IDF"
    }

    fn score(
        &self,
        frequency: f64,
        doc_length: f64,
        term: &LexiconEntry,
        collection: &CollectionStatistics,
    ) -> f64 {
        if frequency <= 0.0 {
            return 0.0;
        }
        let documents = collection.number_of_documents() as f64;
        let doc_frequency = term.doc_frequency() as f64;
        let tf_component = 1.0 + frequency.ln();
        let idf = (documents / doc_frequency).ln();

        let average_length = collection.average_document_length();
        let norm = if doc_length > 0.0 && average_length > 0.0 {
            (average_length / doc_length).sqrt()
        } else {
            1.0
        };

        tf_component * idf * norm
    }
}

/// DLH hypergeometric model (parameter-free divergence-from-randomness).
///
/// A degenerate posting whose frequency equals its document length yields
/// negative infinity; callers treating that as "effectively unrankable" get
/// the same answer the model family has always given.
#[derive(Debug, Clone, Default)]
pub struct Dlh;

impl WeightingModel for Dlh {
    fn name(&self) -> &str {
        "DLH"
    }

    fn score(
        &self,
        frequency: f64,
        doc_length: f64,
        term: &LexiconEntry,
        collection: &CollectionStatistics,
    ) -> f64 {
        if frequency <= 0.0 {
            return 0.0;
        }
        let documents = collection.number_of_documents() as f64;
        let total_frequency = term.total_frequency() as f64;
        let average_length = collection.average_document_length();
        let relative_frequency = frequency / doc_length;

        (frequency
            * ((frequency * average_length / doc_length) * (documents / total_frequency)).log2()
            + 0.5 * (2.0 * PI * frequency * (1.0 - relative_frequency)).log2())
            / (frequency + 0.5)
    }
}
