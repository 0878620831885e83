//! Sparse score accumulator for term-at-a-time matching.

use ahash::AHashMap;

use crate::results::ResultSet;

/// Docid-keyed score and occurrence accumulator.
///
/// Sized near the expected number of matching documents rather than the
/// collection size; this is what makes TAAT cheap when the collection is far
/// larger than the query's combined posting lists. Consumed by
/// [`AccumulatorResultSet::finalize`] into a dense [`ResultSet`]; sorting and
/// paging are only available on the finalized form.
#[derive(Debug, Default)]
pub struct AccumulatorResultSet {
    scores: AHashMap<u64, f64>,
    occurrences: AHashMap<u64, u16>,
}

impl AccumulatorResultSet {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        AccumulatorResultSet::default()
    }

    /// Create an accumulator sized for roughly `expected` matching documents.
    pub fn with_expected_matches(expected: usize) -> Self {
        AccumulatorResultSet {
            scores: AHashMap::with_capacity(expected),
            occurrences: AHashMap::with_capacity(expected),
        }
    }

    /// Add one query slot's contribution for a document.
    ///
    /// Adds `score` into the document's running total and counts one matched
    /// slot.
    pub fn accumulate(&mut self, doc_id: u64, score: f64) {
        *self.scores.entry(doc_id).or_insert(0.0) += score;
        *self.occurrences.entry(doc_id).or_insert(0) += 1;
    }

    /// Add score mass without counting a matched slot.
    ///
    /// Documents that only ever receive score through this method are
    /// excluded at finalization.
    pub fn add_score(&mut self, doc_id: u64, score: f64) {
        *self.scores.entry(doc_id).or_insert(0.0) += score;
    }

    /// Number of documents carrying any accumulated score.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Materialize into a dense result set.
    ///
    /// Documents with zero matched slots are excluded; the rest are emitted
    /// in ascending docid order with the exact result size set to the match
    /// count.
    pub fn finalize(self) -> ResultSet {
        let occurrences = self.occurrences;
        let mut matched: Vec<(u64, f64)> = self
            .scores
            .into_iter()
            .filter(|(doc_id, _)| occurrences.get(doc_id).copied().unwrap_or(0) > 0)
            .collect();
        matched.sort_unstable_by_key(|&(doc_id, _)| doc_id);

        let mut docids = Vec::with_capacity(matched.len());
        let mut scores = Vec::with_capacity(matched.len());
        let mut counts = Vec::with_capacity(matched.len());
        for (doc_id, score) in matched {
            docids.push(doc_id);
            scores.push(score);
            counts.push(occurrences[&doc_id]);
        }
        let exact = docids.len() as u64;
        ResultSet::from_parts(docids, scores, counts, exact)
    }
}
