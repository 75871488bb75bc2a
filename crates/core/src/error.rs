//! Error types for the BPE tokenizer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Error during tokenization
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// Error during training
    #[error("Training error: {0}")]
    Training(String),

    /// Error loading a saved model
    #[error("Load error: {0}")]
    Load(String),

    /// Error saving a model
    #[error("Save error: {0}")]
    Save(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown token ID
    #[error("Unknown token ID: {0}")]
    UnknownTokenId(u32),

    /// Unknown token string
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// Too many corpus documents failed to decode
    #[error("Corpus skip rate exceeded: {skipped} of {total} documents unreadable")]
    SkipRateExceeded { skipped: u64, total: u64 },
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
