//! Error types for mnemo.

use thiserror::Error;

use crate::store;

/// Main error type for mnemo operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding capability failed.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Embedding call exceeded the configured timeout.
    #[error("Embedding timed out after {timeout_ms} ms")]
    EmbeddingTimeout { timeout_ms: u64 },

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] store::Error),

    /// Empty or whitespace-only input.
    #[error("Input is empty")]
    EmptyInput,

    /// Input exceeds the maximum allowed length.
    #[error("Input too long: {actual_length} characters (max {max_length})")]
    InputTooLong {
        max_length: usize,
        actual_length: usize,
    },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
