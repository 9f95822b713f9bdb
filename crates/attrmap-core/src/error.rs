//! Error types for attribute map encoding and decoding operations.

use thiserror::Error;

/// Errors that can occur while transcoding between documents and attribute maps.
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The document does not have the shape the store requires (e.g., a non-object root).
    #[error("Invalid document shape: {0}")]
    InvalidShape(String),

    /// A wire value matched none, or more than one, of the ten attribute variants.
    #[error("Invalid attribute value: {0}")]
    InvalidAttribute(String),

    /// A recognized sentinel carried a payload that could not be decoded.
    #[error("Invalid payload for sentinel '{key}': {message}")]
    InvalidSentinelPayload { key: &'static str, message: String },

    /// Number text that is not a valid JSON number.
    #[error("Invalid number text: {0:?}")]
    InvalidNumberText(String),

    /// The input nests deeper than the configured limit.
    #[error("Nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize },

    /// JSON (de)serialization failed (string entry points and item mapping).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout attrmap-core.
pub type Result<T> = std::result::Result<T, TranscodeError>;
