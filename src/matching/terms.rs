//! Compiled query terms for matching.

use std::sync::Arc;

use crate::scoring::WeightingModel;
use crate::structures::LexiconEntry;

/// Identifier of a synonym group within one query.
///
/// Terms sharing a group id are alternatives for a single query concept and
/// occupy one scoring slot. Group ids are allocated by
/// [`MatchingQueryTerms::add_synonym_group`]; there is no string syntax to
/// express grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynonymGroupId(u32);

/// One compiled query term.
#[derive(Debug, Clone)]
pub struct QueryTermEntry {
    term: String,
    weight: f64,
    statistics: Option<LexiconEntry>,
    model: Option<Arc<dyn WeightingModel>>,
    synonym_group: Option<SynonymGroupId>,
}

impl QueryTermEntry {
    fn new(term: String) -> Self {
        QueryTermEntry {
            term,
            weight: 1.0,
            statistics: None,
            model: None,
            synonym_group: None,
        }
    }

    /// The term string.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Query weight multiplier for this term.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Explicit statistics override, if any.
    pub fn statistics(&self) -> Option<&LexiconEntry> {
        self.statistics.as_ref()
    }

    /// Per-term weighting model, if any.
    pub fn model(&self) -> Option<&Arc<dyn WeightingModel>> {
        self.model.as_ref()
    }

    /// Synonym group this term belongs to, if any.
    pub fn synonym_group(&self) -> Option<SynonymGroupId> {
        self.synonym_group
    }
}

/// Ordered mapping from query terms to their matching properties.
///
/// Entries keep their insertion order; that order defines slot order during
/// matching and, through it, the deterministic tie-break of equal scores.
#[derive(Debug, Clone, Default)]
pub struct MatchingQueryTerms {
    entries: Vec<QueryTermEntry>,
    default_model: Option<Arc<dyn WeightingModel>>,
    next_group: u32,
}

impl MatchingQueryTerms {
    /// Create an empty query.
    pub fn new() -> Self {
        MatchingQueryTerms::default()
    }

    /// Append a term with weight 1.0.
    pub fn add_term<S: Into<String>>(&mut self, term: S) {
        self.entries.push(QueryTermEntry::new(term.into()));
    }

    /// Append a term with an explicit weight.
    pub fn add_weighted_term<S: Into<String>>(&mut self, term: S, weight: f64) {
        let mut entry = QueryTermEntry::new(term.into());
        entry.weight = weight;
        self.entries.push(entry);
    }

    /// Append a group of synonym terms occupying one query slot.
    ///
    /// Returns the allocated group id so further terms can be attached to
    /// the same slot with [`MatchingQueryTerms::add_term_to_group`].
    pub fn add_synonym_group(&mut self, terms: &[&str]) -> SynonymGroupId {
        let group = SynonymGroupId(self.next_group);
        self.next_group += 1;
        for term in terms {
            let mut entry = QueryTermEntry::new((*term).to_string());
            entry.synonym_group = Some(group);
            self.entries.push(entry);
        }
        group
    }

    /// Append one term to an existing synonym group.
    pub fn add_term_to_group<S: Into<String>>(&mut self, term: S, group: SynonymGroupId) {
        let mut entry = QueryTermEntry::new(term.into());
        entry.synonym_group = Some(group);
        self.entries.push(entry);
    }

    /// Set an explicit statistics override for `term`.
    ///
    /// The override is used verbatim by the matching engines in place of the
    /// index's canonical entry, and is never written back to. If the term is
    /// not yet part of the query it is appended.
    pub fn set_statistics(&mut self, term: &str, statistics: LexiconEntry) {
        match self.entries.iter_mut().find(|e| e.term == term) {
            Some(entry) => entry.statistics = Some(statistics),
            None => {
                let mut entry = QueryTermEntry::new(term.to_string());
                entry.statistics = Some(statistics);
                self.entries.push(entry);
            }
        }
    }

    /// Read back the statistics override for `term`, if set.
    pub fn statistics(&self, term: &str) -> Option<&LexiconEntry> {
        self.entries
            .iter()
            .find(|e| e.term == term)
            .and_then(|e| e.statistics.as_ref())
    }

    /// Set a per-term weighting model, overriding the default for that term.
    pub fn set_model(&mut self, term: &str, model: Arc<dyn WeightingModel>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.term == term) {
            entry.model = Some(model);
        }
    }

    /// Set the weighting model used by terms without their own.
    pub fn set_default_model(&mut self, model: Arc<dyn WeightingModel>) {
        self.default_model = Some(model);
    }

    /// The default weighting model, if set.
    pub fn default_model(&self) -> Option<&Arc<dyn WeightingModel>> {
        self.default_model.as_ref()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &QueryTermEntry> {
        self.entries.iter()
    }

    /// Number of query term entries (synonyms counted individually).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the query has no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
