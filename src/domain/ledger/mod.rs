//! Vote ledger for the local voter.
//!
//! One entry per poll, keyed only by poll id: the device has a single voter
//! identity. An entry is written once and never changes.

use std::collections::BTreeMap;

use crate::domain::foundation::{OptionId, PollId};
use crate::domain::poll::PollError;

/// Which option the local voter chose, per poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    entries: BTreeMap<PollId, OptionId>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstitute a ledger from persisted entries.
    pub fn from_entries(entries: BTreeMap<PollId, OptionId>) -> Self {
        Self { entries }
    }

    /// True iff a vote has been recorded for the poll.
    pub fn has_voted(&self, poll_id: &PollId) -> bool {
        self.entries.contains_key(poll_id)
    }

    /// The option chosen for the poll, if any.
    pub fn choice_for(&self, poll_id: &PollId) -> Option<&OptionId> {
        self.entries.get(poll_id)
    }

    /// Record the voter's choice for a poll.
    ///
    /// # Errors
    ///
    /// - `DuplicateVote` if the poll already has an entry; the existing
    ///   entry is left untouched
    pub fn record_choice(&mut self, poll_id: PollId, option_id: OptionId) -> Result<(), PollError> {
        if self.has_voted(&poll_id) {
            return Err(PollError::DuplicateVote(poll_id));
        }
        self.entries.insert(poll_id, option_id);
        Ok(())
    }

    pub fn entries(&self) -> &BTreeMap<PollId, OptionId> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
