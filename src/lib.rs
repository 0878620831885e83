//! # Falx
//!
//! A compact document retrieval core for Rust: given a compiled query and an
//! inverted index, produce a ranked set of matching documents.
//!
//! ## Features
//!
//! - Forward-only posting iterators, with an optional per-field capability
//! - Term-at-a-time (sparse accumulator) and document-at-a-time (k-way
//!   merge) matching strategies producing identical scores
//! - Dense, accumulator and paged result sets with exact-size metadata
//! - First-class synonym groups: one query slot, no double scoring
//! - Pluggable weighting models (BM25, TF-IDF, DLH included)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use falx::analysis::StandardPipeline;
//! use falx::matching::{DaatMatching, Matching, MatchingQueryTerms};
//! use falx::scoring::Bm25;
//! use falx::structures::MemoryIndex;
//!
//! # fn main() -> falx::error::Result<()> {
//! let index = Arc::new(MemoryIndex::from_documents(
//!     &["The quick brown fox jumps over the lazy dog"],
//!     &StandardPipeline::default(),
//! )?);
//!
//! let mut terms = MatchingQueryTerms::new();
//! terms.add_term("quick");
//! terms.set_default_model(Arc::new(Bm25::default()));
//!
//! let engine = DaatMatching::new(index);
//! let results = engine.match_query("query1", &terms)?;
//! assert_eq!(results.result_size(), 1);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod error;
pub mod matching;
pub mod postings;
pub mod results;
pub mod scoring;
pub mod structures;

pub mod prelude {
    //! Commonly used types, re-exported.
    pub use crate::analysis::{StandardPipeline, TermPipeline};
    pub use crate::error::{FalxError, Result};
    pub use crate::matching::{
        DaatMatching, Matching, MatchingQueryTerms, StreamingTaatMatching, TaatMatching,
    };
    pub use crate::postings::{FieldPostingIterator, PostingIterator};
    pub use crate::results::{AccumulatorResultSet, ResultSet};
    pub use crate::scoring::{Bm25, Dlh, TfIdf, WeightingModel};
    pub use crate::structures::{CollectionStatistics, Index, LexiconEntry, MemoryIndex};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
