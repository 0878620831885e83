//! In-memory reference index.
//!
//! [`MemoryIndex`] is a minimal inverted index held entirely in memory,
//! built from raw document text through a [`TermPipeline`]. It exists so the
//! retrieval core is usable and testable end-to-end; production index
//! construction and storage live outside this crate.

use ahash::AHashMap;

use crate::analysis::{TermPipeline, tokenize_with};
use crate::error::{FalxError, Result};
use crate::postings::{ArrayFieldPostingIterator, ArrayPostingIterator, PostingIterator};
use crate::structures::{CollectionStatistics, Index, Lexicon, LexiconEntry};

/// Posting data for one term, parallel by array position.
#[derive(Debug, Default)]
struct TermPostings {
    ids: Vec<u64>,
    frequencies: Vec<u32>,
    /// Per-posting rows of per-field frequencies; empty for unfielded indexes.
    field_frequencies: Vec<Vec<u32>>,
}

/// An inverted index held in memory.
///
/// Documents are identified by their position in the slice passed at
/// construction (document id 0 is the first document). Posting lists come out
/// ascending by document id by construction.
#[derive(Debug)]
pub struct MemoryIndex {
    lexicon: Lexicon,
    postings: Vec<TermPostings>,
    doc_lengths: Vec<u32>,
    /// Per-document rows of per-field lengths; empty for unfielded indexes.
    doc_field_lengths: Vec<Vec<u32>>,
    fields: Vec<String>,
    statistics: CollectionStatistics,
}

impl MemoryIndex {
    /// Build an index over plain documents.
    pub fn from_documents<P: TermPipeline + ?Sized>(
        documents: &[&str],
        pipeline: &P,
    ) -> Result<Self> {
        let mut builder = Builder::new(Vec::new());
        for (doc_id, text) in documents.iter().enumerate() {
            builder.add_document(doc_id as u64, &[(0, *text)], pipeline);
        }
        Ok(builder.build())
    }

    /// Build an index over fielded documents.
    ///
    /// Each document is a sequence of `(field, text)` pairs; every field name
    /// must appear in `fields`. Field frequencies and lengths are recorded
    /// per posting and per document, and surfaced through
    /// [`ArrayFieldPostingIterator`].
    pub fn from_fielded_documents<P: TermPipeline + ?Sized>(
        fields: &[&str],
        documents: &[&[(&str, &str)]],
        pipeline: &P,
    ) -> Result<Self> {
        let field_names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let mut builder = Builder::new(field_names);
        for (doc_id, doc) in documents.iter().enumerate() {
            let mut parts = Vec::with_capacity(doc.len());
            for (field, text) in doc.iter() {
                let field_index = fields.iter().position(|f| f == field).ok_or_else(|| {
                    FalxError::index(format!("unknown field '{field}' in document {doc_id}"))
                })?;
                parts.push((field_index, *text));
            }
            builder.add_document(doc_id as u64, &parts, pipeline);
        }
        Ok(builder.build())
    }

    /// The index's term dictionary.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Field names this index was built with; empty for unfielded indexes.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Length of a document in tokens.
    pub fn doc_length(&self, doc_id: u64) -> Option<u32> {
        self.doc_lengths.get(doc_id as usize).copied()
    }

    /// Open a field-aware posting iterator for `entry`.
    ///
    /// Fails for indexes built without fields.
    pub fn field_postings(&self, entry: &LexiconEntry) -> Result<ArrayFieldPostingIterator> {
        if self.fields.is_empty() {
            return Err(FalxError::invalid_operation(
                "index was built without fields",
            ));
        }
        let list = self.term_postings(entry)?;
        let lengths = self.posting_lengths(list);
        let field_lengths = list
            .ids
            .iter()
            .map(|&doc_id| self.doc_field_lengths[doc_id as usize].clone())
            .collect();
        ArrayFieldPostingIterator::new(
            list.ids.clone(),
            list.frequencies.clone(),
            lengths,
            list.field_frequencies.clone(),
            field_lengths,
        )
    }

    fn term_postings(&self, entry: &LexiconEntry) -> Result<&TermPostings> {
        self.postings
            .get(entry.term_id() as usize)
            .ok_or_else(|| FalxError::index(format!("unknown term id {}", entry.term_id())))
    }

    fn posting_lengths(&self, list: &TermPostings) -> Vec<u32> {
        list.ids
            .iter()
            .map(|&doc_id| self.doc_lengths[doc_id as usize])
            .collect()
    }
}

impl Index for MemoryIndex {
    fn lexicon_entry(&self, term: &str) -> Option<LexiconEntry> {
        self.lexicon.lookup(term).cloned()
    }

    fn postings(&self, entry: &LexiconEntry) -> Result<Box<dyn PostingIterator>> {
        let list = self.term_postings(entry)?;
        let lengths = self.posting_lengths(list);
        if self.fields.is_empty() {
            Ok(Box::new(ArrayPostingIterator::new(
                list.ids.clone(),
                list.frequencies.clone(),
                lengths,
            )?))
        } else {
            let field_lengths = list
                .ids
                .iter()
                .map(|&doc_id| self.doc_field_lengths[doc_id as usize].clone())
                .collect();
            Ok(Box::new(ArrayFieldPostingIterator::new(
                list.ids.clone(),
                list.frequencies.clone(),
                lengths,
                list.field_frequencies.clone(),
                field_lengths,
            )?))
        }
    }

    fn collection_statistics(&self) -> &CollectionStatistics {
        &self.statistics
    }
}

/// Incremental index construction state.
struct Builder {
    lexicon: Lexicon,
    postings: Vec<TermPostings>,
    doc_lengths: Vec<u32>,
    doc_field_lengths: Vec<Vec<u32>>,
    fields: Vec<String>,
    total_tokens: u64,
}

impl Builder {
    fn new(fields: Vec<String>) -> Self {
        Builder {
            lexicon: Lexicon::new(),
            postings: Vec::new(),
            doc_lengths: Vec::new(),
            doc_field_lengths: Vec::new(),
            fields,
            total_tokens: 0,
        }
    }

    /// Index one document given as `(field_index, text)` parts.
    fn add_document<P: TermPipeline + ?Sized>(
        &mut self,
        doc_id: u64,
        parts: &[(usize, &str)],
        pipeline: &P,
    ) {
        let field_count = self.fields.len();
        let mut field_lengths = vec![0u32; field_count];
        // Term counts in first-seen order so term ids are deterministic.
        let mut order: Vec<(String, u32, Vec<u32>)> = Vec::new();
        let mut slots: AHashMap<String, usize> = AHashMap::new();
        let mut doc_length = 0u32;

        for &(field_index, text) in parts {
            for token in tokenize_with(text, pipeline) {
                doc_length += 1;
                if field_count > 0 {
                    field_lengths[field_index] += 1;
                }
                let slot = *slots.entry(token.clone()).or_insert_with(|| {
                    order.push((token, 0, vec![0u32; field_count]));
                    order.len() - 1
                });
                order[slot].1 += 1;
                if field_count > 0 {
                    order[slot].2[field_index] += 1;
                }
            }
        }

        self.doc_lengths.push(doc_length);
        self.total_tokens += doc_length as u64;
        if field_count > 0 {
            self.doc_field_lengths.push(field_lengths);
        }

        for (term, frequency, field_row) in order {
            let term_id = match self.lexicon.lookup_mut(&term) {
                Some(entry) => {
                    entry.record(frequency as u64);
                    entry.term_id()
                }
                None => {
                    let term_id = self.postings.len() as u64;
                    self.lexicon
                        .insert(term, LexiconEntry::new(term_id, 1, frequency as u64));
                    self.postings.push(TermPostings::default());
                    term_id
                }
            };
            let list = &mut self.postings[term_id as usize];
            list.ids.push(doc_id);
            list.frequencies.push(frequency);
            if field_count > 0 {
                list.field_frequencies.push(field_row);
            }
        }
    }

    fn build(self) -> MemoryIndex {
        let statistics = CollectionStatistics::new(
            self.doc_lengths.len() as u64,
            self.lexicon.len() as u64,
            self.total_tokens,
        );
        MemoryIndex {
            lexicon: self.lexicon,
            postings: self.postings,
            doc_lengths: self.doc_lengths,
            doc_field_lengths: self.doc_field_lengths,
            fields: self.fields,
            statistics,
        }
    }
}
