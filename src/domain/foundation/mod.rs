//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types
//! that form the vocabulary of the VoteVision domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{CreatorId, OptionId, PollId};
pub use timestamp::Timestamp;
