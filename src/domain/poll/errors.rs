//! Poll-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, OptionId, PollId};

/// Errors surfaced by poll creation, voting, and store loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Question is empty after trimming.
    #[error("Question cannot be empty")]
    InvalidQuestion,

    /// Fewer than the minimum number of non-empty options.
    #[error("At least {min} options are required, got {provided}")]
    InsufficientOptions { provided: usize, min: usize },

    /// More than the maximum number of options.
    #[error("At most {max} options are allowed, got {provided}")]
    TooManyOptions { provided: usize, max: usize },

    #[error("Poll not found: {0}")]
    PollNotFound(PollId),

    #[error("Option {option_id} does not belong to poll {poll_id}")]
    OptionNotFound { poll_id: PollId, option_id: OptionId },

    /// A vote for this poll has already been recorded.
    #[error("Already voted on poll {0}")]
    DuplicateVote(PollId),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Persisted data did not match the expected schema.
    #[error("Corrupt persisted state: {0}")]
    CorruptState(String),
}

impl PollError {
    pub fn persistence(message: impl Into<String>) -> Self {
        PollError::PersistenceFailure(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        PollError::CorruptState(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PollError::InvalidQuestion => ErrorCode::InvalidQuestion,
            PollError::InsufficientOptions { .. } => ErrorCode::InsufficientOptions,
            PollError::TooManyOptions { .. } => ErrorCode::TooManyOptions,
            PollError::PollNotFound(_) => ErrorCode::PollNotFound,
            PollError::OptionNotFound { .. } => ErrorCode::OptionNotFound,
            PollError::DuplicateVote(_) => ErrorCode::DuplicateVote,
            PollError::PersistenceFailure(_) => ErrorCode::PersistenceFailure,
            PollError::CorruptState(_) => ErrorCode::CorruptState,
        }
    }
}
