//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable error codes surfaced to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    InvalidQuestion,
    InsufficientOptions,
    TooManyOptions,

    // Not found errors
    PollNotFound,
    OptionNotFound,

    // State errors
    DuplicateVote,

    // Infrastructure errors
    PersistenceFailure,
    CorruptState,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidQuestion => "INVALID_QUESTION",
            ErrorCode::InsufficientOptions => "INSUFFICIENT_OPTIONS",
            ErrorCode::TooManyOptions => "TOO_MANY_OPTIONS",
            ErrorCode::PollNotFound => "POLL_NOT_FOUND",
            ErrorCode::OptionNotFound => "OPTION_NOT_FOUND",
            ErrorCode::DuplicateVote => "DUPLICATE_VOTE",
            ErrorCode::PersistenceFailure => "PERSISTENCE_FAILURE",
            ErrorCode::CorruptState => "CORRUPT_STATE",
        };
        write!(f, "{}", s)
    }
}
