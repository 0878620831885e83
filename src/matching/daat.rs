//! Document-at-a-time matching.
//!
//! All query slots' posting streams are open simultaneously; a min-heap over
//! their pending document ids drives a k-way merge, so each document's score
//! is finalized exactly once, in ascending docid order, and written straight
//! into a dense result set — no intermediate sparse accumulator.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use log::debug;

use crate::error::{FalxError, Result};
use crate::matching::{Matching, MatchingQueryTerms, resolve_slots};
use crate::results::ResultSet;
use crate::structures::Index;

/// Document-at-a-time matching engine.
///
/// Relies on the index-level invariant that posting lists are ascending by
/// document id, and asserts it while merging rather than silently
/// mis-scoring.
#[derive(Debug)]
pub struct DaatMatching {
    index: Arc<dyn Index>,
}

impl DaatMatching {
    /// Create a DAAT engine over `index`.
    pub fn new(index: Arc<dyn Index>) -> Self {
        DaatMatching { index }
    }
}

impl Matching for DaatMatching {
    fn match_query(&self, query_id: &str, terms: &MatchingQueryTerms) -> Result<ResultSet> {
        let mut slots = resolve_slots(self.index.as_ref(), terms)?;
        if slots.is_empty() {
            debug!("query {query_id}: no query terms present in index");
            return Ok(ResultSet::empty());
        }
        let collection = self.index.collection_statistics();
        let mut results = ResultSet::with_capacity(collection.number_of_documents() as usize);

        // Min-heap of (pending docid, slot index); for one docid the cohort
        // pops in slot order, so contributions sum in the same order TAAT
        // adds them.
        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = slots
            .iter()
            .enumerate()
            .filter_map(|(slot_index, slot)| {
                slot.cursor.peek().map(|doc_id| Reverse((doc_id, slot_index)))
            })
            .collect();

        while let Some(Reverse((doc_id, first_slot))) = heap.pop() {
            let mut cohort = vec![first_slot];
            while let Some(&Reverse((pending, _))) = heap.peek() {
                if pending != doc_id {
                    break;
                }
                let Some(Reverse((_, slot_index))) = heap.pop() else {
                    break;
                };
                cohort.push(slot_index);
            }

            let mut score = 0.0;
            for &slot_index in &cohort {
                let slot = &mut slots[slot_index];
                let posting = slot.cursor.advance()?.ok_or_else(|| {
                    FalxError::inconsistency(format!(
                        "slot cursor exhausted before scheduled document {doc_id}"
                    ))
                })?;
                if posting.doc_id != doc_id {
                    return Err(FalxError::inconsistency(format!(
                        "slot cursor produced document {} while merging document {doc_id}",
                        posting.doc_id
                    )));
                }
                score += slot.weight
                    * slot.model.score(
                        posting.frequency,
                        posting.doc_length,
                        &slot.statistics,
                        collection,
                    );
                if let Some(next) = slot.cursor.peek() {
                    heap.push(Reverse((next, slot_index)));
                }
            }

            results.push(doc_id, score, cohort.len() as u16)?;
        }

        results.set_exact_result_size(results.result_size() as u64);
        results.sort();
        debug!(
            "query {query_id}: DAAT matched {} documents",
            results.result_size()
        );
        Ok(results)
    }
}
