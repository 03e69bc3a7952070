//! Crypto error types.

use thiserror::Error;

/// Hashing and encoding errors.
#[derive(Debug, Error)]
pub enum HashingError {
    /// The record contains a value the canonical encoder cannot represent.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A hex digest string could not be decoded.
    #[error("Invalid digest hex: {0}")]
    InvalidHex(String),

    /// A decoded digest had the wrong length.
    #[error("Invalid digest length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

impl From<serde_json::Error> for HashingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
