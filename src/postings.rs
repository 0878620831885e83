//! Posting list iteration.
//!
//! A posting iterator is a sequential, forward-only cursor over one term's
//! occurrences. Positional accessors are valid only between a successful
//! [`PostingIterator::next`] and the following `next`; before the first
//! advance and after exhaustion they fail with an invalid-state error.
//!
//! There is deliberately no skip/seek operation at this abstraction: the
//! matching strategies either scan linearly (TAAT) or maintain their own
//! merge cursors (DAAT).

pub mod array;

use std::fmt::Debug;

use crate::error::Result;

pub use array::{ArrayFieldPostingIterator, ArrayPostingIterator};

/// Forward-only cursor over a term's posting list.
///
/// Posting lists are ordered ascending by document id; that ordering is an
/// index-level invariant which consumers of this trait are entitled to rely
/// on (and which the matching engines assert).
pub trait PostingIterator: Send + Debug {
    /// Advance to the next posting.
    ///
    /// Returns the document id of the new position, or `None` once the list
    /// is exhausted. After `None`, the iterator is in a terminal state and
    /// every positional accessor fails.
    fn next(&mut self) -> Result<Option<u64>>;

    /// Document id at the current position.
    fn doc_id(&self) -> Result<u64>;

    /// Term frequency within the current document.
    fn frequency(&self) -> Result<u32>;

    /// Length (in tokens) of the current document.
    fn doc_length(&self) -> Result<u32>;
}

/// Capability extension for postings carrying per-field statistics.
///
/// The returned slices are rows of backing storage at the iterator's current
/// position; they must not be retained across a subsequent
/// [`PostingIterator::next`] call. For the array-backed implementation the
/// borrow checker enforces this.
pub trait FieldPostingIterator: PostingIterator {
    /// Per-field term frequencies for the current document.
    fn field_frequencies(&self) -> Result<&[u32]>;

    /// Per-field lengths of the current document.
    fn field_lengths(&self) -> Result<&[u32]>;
}
