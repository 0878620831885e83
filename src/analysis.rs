//! Term normalization for query and document text.
//!
//! Falx treats term normalization as an external collaborator: the matching
//! engines never tokenize anything themselves. This module provides the
//! pipeline trait, a standard implementation driven by an explicit
//! [`PipelineConfig`] (never process-wide settings), and [`SharedStage`], a
//! synchronized wrapper for pipeline stages that carry interior mutable state
//! (stemmer tables, caches) and are shared across threads.

use std::fmt::Debug;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Configuration for the standard term pipeline.
///
/// Passed explicitly at construction; a pipeline never consults global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lowercase tokens before indexing/matching.
    pub lowercase: bool,

    /// Drop tokens shorter than this many characters.
    pub min_token_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            lowercase: true,
            min_token_length: 1,
        }
    }
}

/// A term normalization pipeline.
///
/// Maps a raw token to its indexed form, or to `None` to drop it entirely
/// (stopword removal, length filtering).
pub trait TermPipeline: Send + Sync + Debug {
    /// Normalize a single token.
    fn process(&self, token: &str) -> Option<String>;
}

/// Standard pipeline: lowercasing and length filtering per [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct StandardPipeline {
    config: PipelineConfig,
}

impl StandardPipeline {
    /// Create a new standard pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        StandardPipeline { config }
    }
}

impl TermPipeline for StandardPipeline {
    fn process(&self, token: &str) -> Option<String> {
        if token.chars().count() < self.config.min_token_length {
            return None;
        }
        if self.config.lowercase {
            Some(token.to_lowercase())
        } else {
            Some(token.to_string())
        }
    }
}

/// Pipeline that passes every token through unchanged.
#[derive(Debug, Clone, Default)]
pub struct NoopPipeline;

impl TermPipeline for NoopPipeline {
    fn process(&self, token: &str) -> Option<String> {
        Some(token.to_string())
    }
}

/// A pipeline stage with interior mutable state.
///
/// Stages like stemmers keep working tables between invocations; those cannot
/// implement [`TermPipeline`] directly because `process` takes `&self`.
pub trait TermStage: Send + Debug {
    /// Apply this stage to a token, possibly mutating internal state.
    fn apply(&mut self, token: &str) -> Option<String>;
}

/// Synchronized accessor around a stateful pipeline stage.
///
/// Callers sharing one stage across threads go through the mutex here rather
/// than synchronizing at each call site.
#[derive(Debug)]
pub struct SharedStage<S: TermStage> {
    inner: Mutex<S>,
}

impl<S: TermStage> SharedStage<S> {
    /// Wrap a stage for shared use.
    pub fn new(stage: S) -> Self {
        SharedStage {
            inner: Mutex::new(stage),
        }
    }
}

impl<S: TermStage> TermPipeline for SharedStage<S> {
    fn process(&self, token: &str) -> Option<String> {
        self.inner.lock().apply(token)
    }
}

/// Split `text` into Unicode words and run each through `pipeline`.
///
/// Tokens the pipeline drops are omitted from the result.
pub fn tokenize_with<P: TermPipeline + ?Sized>(text: &str, pipeline: &P) -> Vec<String> {
    text.unicode_words()
        .filter_map(|token| pipeline.process(token))
        .collect()
}
