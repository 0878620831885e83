//! Error types for the Falx library.
//!
//! All fallible operations in Falx return [`Result`], whose error type is the
//! [`FalxError`] enum defined here.
//!
//! # Examples
//!
//! ```
//! use falx::error::{FalxError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FalxError::query("Empty query"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Falx operations.
///
/// This enum represents all possible errors that can occur in the Falx library.
/// It uses the `thiserror` crate for automatic `Error` trait implementation and
/// provides convenient constructor methods for creating specific error types.
#[derive(Error, Debug)]
pub enum FalxError {
    /// I/O errors (posting source reads, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (empty queries, unresolvable weighting models, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Analysis-related errors (tokenization, term pipelines)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid operation (out-of-range result slot, over-capacity write, etc.)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Invalid state (positional accessor on an unpositioned or exhausted cursor)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal consistency violation in index structures
    /// (non-ascending posting lists, parallel-array length mismatch)
    #[error("Internal consistency error: {0}")]
    Inconsistency(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FalxError.
pub type Result<T> = std::result::Result<T, FalxError>;

impl FalxError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        FalxError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        FalxError::Query(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FalxError::Analysis(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        FalxError::InvalidOperation(msg.into())
    }

    /// Create a new invalid state error.
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        FalxError::InvalidState(msg.into())
    }

    /// Create a new internal consistency error.
    pub fn inconsistency<S: Into<String>>(msg: S) -> Self {
        FalxError::Inconsistency(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FalxError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FalxError::Other(msg.into())
    }
}
