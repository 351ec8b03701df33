//! Error types for QuoteCore.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Main error type for quote operations
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("Empty selection: {0}")]
    Empty(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuoteError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        QuoteError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new format error
    pub fn format(message: impl Into<String>) -> Self {
        QuoteError::Format(message.into())
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        QuoteError::Network(message.into())
    }

    /// Create a new sync error
    pub fn sync(message: impl Into<String>) -> Self {
        QuoteError::Sync(message.into())
    }

    /// Create a new empty-selection error
    pub fn empty(message: impl Into<String>) -> Self {
        QuoteError::Empty(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        QuoteError::Config(message.into())
    }
}
