//! Ranked result sets.
//!
//! The dense [`ResultSet`] holds docid/score/occurrence parallel arrays with
//! a fixed capacity; the sparse [`AccumulatorResultSet`] accumulates scores
//! keyed by docid during TAAT matching and is consumed into a dense set by
//! [`AccumulatorResultSet::finalize`]. Sorting and paging live only on the
//! dense type, so a non-finalized accumulator cannot be sorted by
//! construction.

pub mod accumulator;

use std::cmp::Ordering;

use crate::error::{FalxError, Result};

pub use accumulator::AccumulatorResultSet;

/// Dense, capacity-bounded ranked results.
///
/// `docids[i]`, `scores[i]` and `occurrences[i]` refer to the same document
/// for all `i`. The exact result size is independent metadata: the true
/// number of matching documents before any truncation or paging, which a
/// sliced sub-result inherits from its parent.
#[derive(Debug, Clone)]
pub struct ResultSet {
    docids: Vec<u64>,
    scores: Vec<f64>,
    occurrences: Vec<u16>,
    capacity: usize,
    exact_result_size: u64,
}

impl ResultSet {
    /// Create an empty result set able to hold `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        ResultSet {
            docids: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
            occurrences: Vec::with_capacity(capacity),
            capacity,
            exact_result_size: 0,
        }
    }

    /// Create an empty result set with no capacity (a no-match result).
    pub fn empty() -> Self {
        ResultSet::with_capacity(0)
    }

    /// Assemble a result set from already-parallel arrays.
    pub(crate) fn from_parts(
        docids: Vec<u64>,
        scores: Vec<f64>,
        occurrences: Vec<u16>,
        exact_result_size: u64,
    ) -> Self {
        let capacity = docids.len();
        ResultSet {
            docids,
            scores,
            occurrences,
            capacity,
            exact_result_size,
        }
    }

    /// Clear all slots and reset the exact result size. Idempotent.
    pub fn initialise(&mut self) {
        self.docids.clear();
        self.scores.clear();
        self.occurrences.clear();
        self.exact_result_size = 0;
    }

    /// Append one scored document.
    ///
    /// Fails with an invalid-operation error once the capacity is reached.
    pub fn push(&mut self, doc_id: u64, score: f64, occurrences: u16) -> Result<()> {
        if self.docids.len() >= self.capacity {
            return Err(FalxError::invalid_operation(format!(
                "result set capacity {} exceeded",
                self.capacity
            )));
        }
        self.docids.push(doc_id);
        self.scores.push(score);
        self.occurrences.push(occurrences);
        Ok(())
    }

    /// Number of materialized results.
    pub fn result_size(&self) -> usize {
        self.docids.len()
    }

    /// Maximum number of results this set can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if no results are materialized.
    pub fn is_empty(&self) -> bool {
        self.docids.is_empty()
    }

    /// Materialized document ids.
    pub fn docids(&self) -> &[u64] {
        &self.docids
    }

    /// Materialized scores, parallel to [`ResultSet::docids`].
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Matched-slot counts, parallel to [`ResultSet::docids`].
    pub fn occurrences(&self) -> &[u16] {
        &self.occurrences
    }

    /// Document id at `index`, bounds-checked against the result size.
    pub fn docid(&self, index: usize) -> Result<u64> {
        self.check_bounds(index)?;
        Ok(self.docids[index])
    }

    /// Score at `index`, bounds-checked against the result size.
    pub fn score(&self, index: usize) -> Result<f64> {
        self.check_bounds(index)?;
        Ok(self.scores[index])
    }

    /// Matched-slot count at `index`, bounds-checked against the result size.
    pub fn occurrence(&self, index: usize) -> Result<u16> {
        self.check_bounds(index)?;
        Ok(self.occurrences[index])
    }

    /// True number of matching documents, independent of materialization.
    pub fn exact_result_size(&self) -> u64 {
        self.exact_result_size
    }

    /// Set the true number of matching documents.
    pub fn set_exact_result_size(&mut self, exact_result_size: u64) {
        self.exact_result_size = exact_result_size;
    }

    /// Sort by score descending.
    ///
    /// The sort is stable: equal scores keep their current relative order,
    /// which for engine-produced sets is ascending docid.
    pub fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.docids.len()).collect();
        order.sort_by(|&a, &b| {
            self.scores[b]
                .partial_cmp(&self.scores[a])
                .unwrap_or(Ordering::Equal)
        });
        let docids = order.iter().map(|&i| self.docids[i]).collect();
        let scores = order.iter().map(|&i| self.scores[i]).collect();
        let occurrences = order.iter().map(|&i| self.occurrences[i]).collect();
        self.docids = docids;
        self.scores = scores;
        self.occurrences = occurrences;
    }

    /// Extract the `[start, start + length)` sub-range as a new result set.
    ///
    /// `length` is clamped to the available suffix. The sub-result carries
    /// this set's exact result size: a slice never changes the true match
    /// count. Sorting beforehand is the caller's responsibility.
    pub fn get_result_set(&self, start: usize, length: usize) -> Result<ResultSet> {
        if start > self.result_size() {
            return Err(FalxError::invalid_operation(format!(
                "slice start {} beyond result size {}",
                start,
                self.result_size()
            )));
        }
        let end = (start + length).min(self.result_size());
        Ok(ResultSet::from_parts(
            self.docids[start..end].to_vec(),
            self.scores[start..end].to_vec(),
            self.occurrences[start..end].to_vec(),
            self.exact_result_size,
        ))
    }

    fn check_bounds(&self, index: usize) -> Result<()> {
        if index >= self.result_size() {
            return Err(FalxError::invalid_operation(format!(
                "index {} out of range for result size {}",
                index,
                self.result_size()
            )));
        }
        Ok(())
    }
}
