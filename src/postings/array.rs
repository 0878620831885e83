//! Array-backed posting iterators.
//!
//! These wrap parallel arrays pulled out of index structures: one entry per
//! posting, addressed consistently by array position. The field-aware variant
//! adds two 2-D arrays whose rows are the per-field statistics of the posting
//! at the same position.

use crate::error::{FalxError, Result};
use crate::postings::{FieldPostingIterator, PostingIterator};

/// Cursor state shared by the array iterators.
///
/// `Start` is before the first advance, `Done` after exhaustion; positional
/// accessors are only valid in `At`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Start,
    At(usize),
    Done,
}

/// Posting iterator over parallel `{ids, frequencies, lengths}` arrays.
#[derive(Debug)]
pub struct ArrayPostingIterator {
    ids: Vec<u64>,
    frequencies: Vec<u32>,
    lengths: Vec<u32>,
    cursor: Cursor,
}

impl ArrayPostingIterator {
    /// Create an iterator over the given parallel arrays.
    ///
    /// The arrays must be equal length; a mismatch is an internal consistency
    /// error.
    pub fn new(ids: Vec<u64>, frequencies: Vec<u32>, lengths: Vec<u32>) -> Result<Self> {
        if frequencies.len() != ids.len() || lengths.len() != ids.len() {
            return Err(FalxError::inconsistency(format!(
                "parallel posting arrays differ in length: {} ids, {} frequencies, {} lengths",
                ids.len(),
                frequencies.len(),
                lengths.len()
            )));
        }
        Ok(ArrayPostingIterator {
            ids,
            frequencies,
            lengths,
            cursor: Cursor::Start,
        })
    }

    /// Number of postings in the backing arrays.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the backing arrays are empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Current array position, if positioned.
    pub(crate) fn position(&self) -> Result<usize> {
        match self.cursor {
            Cursor::At(index) => Ok(index),
            Cursor::Start => Err(FalxError::invalid_state(
                "posting iterator not yet positioned; call next() first",
            )),
            Cursor::Done => Err(FalxError::invalid_state("posting iterator is exhausted")),
        }
    }
}

impl PostingIterator for ArrayPostingIterator {
    fn next(&mut self) -> Result<Option<u64>> {
        let candidate = match self.cursor {
            Cursor::Start => 0,
            Cursor::At(index) => index + 1,
            Cursor::Done => return Ok(None),
        };
        if candidate < self.ids.len() {
            self.cursor = Cursor::At(candidate);
            Ok(Some(self.ids[candidate]))
        } else {
            self.cursor = Cursor::Done;
            Ok(None)
        }
    }

    fn doc_id(&self) -> Result<u64> {
        Ok(self.ids[self.position()?])
    }

    fn frequency(&self) -> Result<u32> {
        Ok(self.frequencies[self.position()?])
    }

    fn doc_length(&self) -> Result<u32> {
        Ok(self.lengths[self.position()?])
    }
}

/// Field-aware posting iterator over parallel arrays.
///
/// In addition to the basic arrays, carries `term_field_frequencies[i]` and
/// `field_lengths[i]` rows for the posting at position `i`. The field arrays
/// are fixed once constructed; any mutation must happen before wrapping.
#[derive(Debug)]
pub struct ArrayFieldPostingIterator {
    base: ArrayPostingIterator,
    term_field_frequencies: Vec<Vec<u32>>,
    field_lengths: Vec<Vec<u32>>,
}

impl ArrayFieldPostingIterator {
    /// Create a field-aware iterator over the given parallel arrays.
    pub fn new(
        ids: Vec<u64>,
        frequencies: Vec<u32>,
        lengths: Vec<u32>,
        term_field_frequencies: Vec<Vec<u32>>,
        field_lengths: Vec<Vec<u32>>,
    ) -> Result<Self> {
        let count = ids.len();
        let base = ArrayPostingIterator::new(ids, frequencies, lengths)?;
        if term_field_frequencies.len() != count || field_lengths.len() != count {
            return Err(FalxError::inconsistency(format!(
                "field posting arrays differ in length: {} postings, {} frequency rows, {} length rows",
                count,
                term_field_frequencies.len(),
                field_lengths.len()
            )));
        }
        Ok(ArrayFieldPostingIterator {
            base,
            term_field_frequencies,
            field_lengths,
        })
    }
}

impl PostingIterator for ArrayFieldPostingIterator {
    fn next(&mut self) -> Result<Option<u64>> {
        self.base.next()
    }

    fn doc_id(&self) -> Result<u64> {
        self.base.doc_id()
    }

    fn frequency(&self) -> Result<u32> {
        self.base.frequency()
    }

    fn doc_length(&self) -> Result<u32> {
        self.base.doc_length()
    }
}

impl FieldPostingIterator for ArrayFieldPostingIterator {
    fn field_frequencies(&self) -> Result<&[u32]> {
        Ok(&self.term_field_frequencies[self.base.position()?])
    }

    fn field_lengths(&self) -> Result<&[u32]> {
        Ok(&self.field_lengths[self.base.position()?])
    }
}
