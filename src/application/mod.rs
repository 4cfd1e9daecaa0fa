//! Application layer - the poll store and its commands.
//!
//! This layer orchestrates domain operations and coordinates with ports.

pub mod store;

pub use store::{CreatePollCommand, PollStore, POLLS_KEY, VOTES_KEY};
