//! Error types for reference parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefError {
    /// The reference string or name is empty.
    #[error("reference cannot be empty")]
    Empty,

    /// The reference has the wrong kind prefix.
    #[error("invalid reference kind: expected '{expected}', got '{actual}'")]
    InvalidKind {
        expected: &'static str,
        actual: String,
    },

    /// The reference is missing the slash separator.
    #[error("reference missing '/' separator")]
    MissingSeparator,

    /// The name portion of the reference is invalid.
    #[error("invalid resource name: {message}")]
    InvalidName { message: String },
}

impl RefError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, RefError::Empty)
    }

    /// Returns true if this error indicates a kind mismatch.
    pub fn is_kind_error(&self) -> bool {
        matches!(self, RefError::InvalidKind { .. })
    }
}
