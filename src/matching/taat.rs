//! Term-at-a-time matching.
//!
//! Each query slot's posting stream is traversed fully before the next slot
//! starts; scores collect in a sparse docid-keyed accumulator that is
//! finalized into a dense result set once every slot is exhausted.

use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::matching::{
    Matching, MatchingQueryTerms, MergedPosting, QuerySlot, resolve_slots,
};
use crate::results::{AccumulatorResultSet, ResultSet};
use crate::structures::{CollectionStatistics, Index};

/// Accumulator capacity hint: the query's combined document frequency,
/// capped at the collection size.
fn expected_matches(slots: &[QuerySlot], collection: &CollectionStatistics) -> usize {
    let combined: u64 = slots.iter().map(|s| s.statistics.doc_frequency()).sum();
    combined.min(collection.number_of_documents()) as usize
}

fn finish(accumulator: AccumulatorResultSet, query_id: &str, strategy: &str) -> ResultSet {
    let mut results = accumulator.finalize();
    results.sort();
    debug!(
        "query {query_id}: {strategy} matched {} documents",
        results.result_size()
    );
    results
}

/// Term-at-a-time matching with pre-loaded posting lists.
///
/// Each slot's merged posting stream is materialized in memory before
/// scoring.
#[derive(Debug)]
pub struct TaatMatching {
    index: Arc<dyn Index>,
}

impl TaatMatching {
    /// Create a TAAT engine over `index`.
    pub fn new(index: Arc<dyn Index>) -> Self {
        TaatMatching { index }
    }
}

impl Matching for TaatMatching {
    fn match_query(&self, query_id: &str, terms: &MatchingQueryTerms) -> Result<ResultSet> {
        let mut slots = resolve_slots(self.index.as_ref(), terms)?;
        if slots.is_empty() {
            debug!("query {query_id}: no query terms present in index");
            return Ok(ResultSet::empty());
        }
        let collection = self.index.collection_statistics();
        let mut accumulator =
            AccumulatorResultSet::with_expected_matches(expected_matches(&slots, collection));

        for slot in &mut slots {
            let mut postings: Vec<MergedPosting> = Vec::new();
            while let Some(posting) = slot.cursor.advance()? {
                postings.push(posting);
            }
            for posting in &postings {
                let score = slot.weight
                    * slot.model.score(
                        posting.frequency,
                        posting.doc_length,
                        &slot.statistics,
                        collection,
                    );
                accumulator.accumulate(posting.doc_id, score);
            }
        }

        Ok(finish(accumulator, query_id, "TAAT"))
    }
}

/// Term-at-a-time matching that streams postings from their source.
///
/// Functionally equivalent to [`TaatMatching`] but never holds a whole
/// posting list in memory: each merged posting is scored as the cursor
/// produces it.
#[derive(Debug)]
pub struct StreamingTaatMatching {
    index: Arc<dyn Index>,
}

impl StreamingTaatMatching {
    /// Create a streaming TAAT engine over `index`.
    pub fn new(index: Arc<dyn Index>) -> Self {
        StreamingTaatMatching { index }
    }
}

impl Matching for StreamingTaatMatching {
    fn match_query(&self, query_id: &str, terms: &MatchingQueryTerms) -> Result<ResultSet> {
        let mut slots = resolve_slots(self.index.as_ref(), terms)?;
        if slots.is_empty() {
            debug!("query {query_id}: no query terms present in index");
            return Ok(ResultSet::empty());
        }
        let collection = self.index.collection_statistics();
        let mut accumulator =
            AccumulatorResultSet::with_expected_matches(expected_matches(&slots, collection));

        for slot in &mut slots {
            while let Some(posting) = slot.cursor.advance()? {
                let score = slot.weight
                    * slot.model.score(
                        posting.frequency,
                        posting.doc_length,
                        &slot.statistics,
                        collection,
                    );
                accumulator.accumulate(posting.doc_id, score);
            }
        }

        Ok(finish(accumulator, query_id, "streaming TAAT"))
    }
}
