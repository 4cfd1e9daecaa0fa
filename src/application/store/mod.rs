//! Poll store - the stateful core behind the UI.
//!
//! `PollStore` owns the poll collection and the vote ledger and persists
//! both through a `KeyValueStore`. `codec` defines the persisted JSON shape.

pub mod codec;
mod poll_store;

pub use codec::{POLLS_KEY, VOTES_KEY};
pub use poll_store::{CreatePollCommand, PollStore};
