//! Index structures consumed by the matching engines.
//!
//! The engines see an index only through the [`Index`] trait: a lexicon
//! lookup, a posting-list source, and collection statistics. Everything an
//! index does beyond that (storage, compression, maintenance) is out of
//! scope here. [`memory::MemoryIndex`] is the in-memory reference
//! implementation.

pub mod collection;
pub mod lexicon;
pub mod memory;

use std::fmt::Debug;

use crate::error::Result;
use crate::postings::PostingIterator;

pub use collection::CollectionStatistics;
pub use lexicon::{Lexicon, LexiconEntry};
pub use memory::MemoryIndex;

/// Read-only view of an inverted index during a matching session.
///
/// Implementations must be shareable across threads: independent queries may
/// run concurrently against one index.
pub trait Index: Send + Sync + Debug {
    /// Look up a term in the lexicon.
    ///
    /// Returns an owned copy of the entry; callers may overwrite the copy's
    /// statistics without affecting the index's canonical values. An absent
    /// term yields `None`, which excludes the term from matching — it is not
    /// an error.
    fn lexicon_entry(&self, term: &str) -> Option<LexiconEntry>;

    /// Open a posting iterator for the term identified by `entry`.
    ///
    /// The returned postings are guaranteed ascending by document id.
    fn postings(&self, entry: &LexiconEntry) -> Result<Box<dyn PostingIterator>>;

    /// Collection-wide statistics for weighting models.
    fn collection_statistics(&self) -> &CollectionStatistics;
}
