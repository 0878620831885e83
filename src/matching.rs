//! Matching engines.
//!
//! A matching engine traverses the posting lists of all query terms against
//! one index and produces a ranked [`ResultSet`]. Two traversal disciplines
//! are provided: term-at-a-time ([`taat`]) and document-at-a-time ([`daat`]).
//! Both compute the same mathematical result — the sum of per-slot weighted
//! model scores for each matching document — differing only in traversal
//! order and memory strategy.
//!
//! Query terms sharing a synonym group occupy one *slot*: their posting
//! lists are merged by document id before scoring, so a document matching
//! several members of one group is scored exactly once for that slot.

pub mod daat;
pub mod taat;
pub mod terms;

use std::fmt::Debug;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::{FalxError, Result};
use crate::postings::PostingIterator;
use crate::results::ResultSet;
use crate::scoring::WeightingModel;
use crate::structures::{Index, LexiconEntry};

pub use daat::DaatMatching;
pub use taat::{StreamingTaatMatching, TaatMatching};
pub use terms::{MatchingQueryTerms, QueryTermEntry, SynonymGroupId};

/// A matching strategy over one index.
///
/// `match_query` is the sole entry point: deterministic given identical index
/// state and query terms. Implementations are shareable across threads; the
/// underlying index is read-only during a matching session.
pub trait Matching: Send + Sync + Debug {
    /// Match `terms` against the index, returning a result set sorted by
    /// score descending.
    fn match_query(&self, query_id: &str, terms: &MatchingQueryTerms) -> Result<ResultSet>;
}

/// One merged posting from a query slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MergedPosting {
    pub doc_id: u64,
    /// Term frequency, summed across the slot's synonym members.
    pub frequency: f64,
    pub doc_length: f64,
}

/// A resolved query slot: one concept to score, with its merged statistics
/// and a cursor over its merged posting stream.
pub(crate) struct QuerySlot {
    pub weight: f64,
    pub model: Arc<dyn WeightingModel>,
    pub statistics: LexiconEntry,
    pub cursor: SlotCursor,
}

/// One member posting list inside a slot.
struct MemberCursor {
    iter: Box<dyn PostingIterator>,
    current: Option<u64>,
}

impl MemberCursor {
    fn advance(&mut self) -> Result<()> {
        let previous = self.current;
        self.current = self.iter.next()?;
        if let (Some(previous), Some(current)) = (previous, self.current) {
            if current <= previous {
                return Err(FalxError::inconsistency(format!(
                    "posting list not ascending: document {current} after {previous}"
                )));
            }
        }
        Ok(())
    }
}

/// Cursor over a slot's posting lists, merged ascending by document id.
///
/// Member lists are asserted strictly ascending as they advance; a violation
/// is an internal consistency error, fatal for the current query.
pub(crate) struct SlotCursor {
    members: Vec<MemberCursor>,
}

impl SlotCursor {
    fn new(iters: Vec<Box<dyn PostingIterator>>) -> Result<Self> {
        let mut members = Vec::with_capacity(iters.len());
        for iter in iters {
            let mut member = MemberCursor {
                iter,
                current: None,
            };
            member.advance()?;
            members.push(member);
        }
        Ok(SlotCursor { members })
    }

    /// Next document id this slot will emit, without consuming it.
    pub fn peek(&self) -> Option<u64> {
        self.members.iter().filter_map(|m| m.current).min()
    }

    /// Consume and return the next merged posting, or `None` at exhaustion.
    ///
    /// Every member positioned at the emitted document contributes its
    /// frequency and is advanced once.
    pub fn advance(&mut self) -> Result<Option<MergedPosting>> {
        let Some(doc_id) = self.peek() else {
            return Ok(None);
        };
        let mut frequency = 0u64;
        let mut doc_length = 0u32;
        for member in &mut self.members {
            if member.current == Some(doc_id) {
                frequency += member.iter.frequency()? as u64;
                doc_length = member.iter.doc_length()?;
                member.advance()?;
            }
        }
        Ok(Some(MergedPosting {
            doc_id,
            frequency: frequency as f64,
            doc_length: doc_length as f64,
        }))
    }
}

/// Resolve query terms into scorable slots.
///
/// Fails before any traversal when the query is empty or a term has no
/// weighting model (and no default is set). Terms absent from the index are
/// excluded without error; a slot with no present members is dropped, so a
/// query entirely of absent terms resolves to no slots.
///
/// An explicit statistics override on a term is used verbatim — the engine
/// never re-derives it from the index.
pub(crate) fn resolve_slots(
    index: &dyn Index,
    terms: &MatchingQueryTerms,
) -> Result<Vec<QuerySlot>> {
    if terms.is_empty() {
        return Err(FalxError::query("no query terms to match"));
    }

    struct PendingSlot {
        weight: f64,
        model: Arc<dyn WeightingModel>,
        statistics: Option<LexiconEntry>,
        postings: Vec<Box<dyn PostingIterator>>,
    }

    let mut pending: Vec<PendingSlot> = Vec::new();
    let mut group_slots: AHashMap<SynonymGroupId, usize> = AHashMap::new();

    for entry in terms.entries() {
        let model = entry
            .model()
            .cloned()
            .or_else(|| terms.default_model().cloned())
            .ok_or_else(|| {
                FalxError::invalid_config(format!(
                    "no weighting model for term '{}' and no default set",
                    entry.term()
                ))
            })?;

        let slot_index = match entry.synonym_group() {
            Some(group) => *group_slots.entry(group).or_insert_with(|| {
                pending.push(PendingSlot {
                    weight: entry.weight(),
                    model: model.clone(),
                    statistics: None,
                    postings: Vec::new(),
                });
                pending.len() - 1
            }),
            None => {
                pending.push(PendingSlot {
                    weight: entry.weight(),
                    model: model.clone(),
                    statistics: None,
                    postings: Vec::new(),
                });
                pending.len() - 1
            }
        };

        let resolved = match entry.statistics() {
            Some(overridden) => Some(overridden.clone()),
            None => index.lexicon_entry(entry.term()),
        };
        let Some(statistics) = resolved else {
            continue;
        };

        let slot = &mut pending[slot_index];
        slot.postings.push(index.postings(&statistics)?);
        match &mut slot.statistics {
            Some(merged) => merged.add_statistics(&statistics),
            None => slot.statistics = Some(statistics),
        }
    }

    let mut slots = Vec::new();
    for slot in pending {
        let Some(statistics) = slot.statistics else {
            continue;
        };
        slots.push(QuerySlot {
            weight: slot.weight,
            model: slot.model,
            statistics,
            cursor: SlotCursor::new(slot.postings)?,
        });
    }
    Ok(slots)
}
