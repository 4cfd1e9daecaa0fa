//! Persisted JSON schema for polls and the vote ledger.
//!
//! Decoding validates shape and domain rules at the load boundary; anything
//! that does not fit becomes `PollError::CorruptState`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::foundation::{CreatorId, OptionId, PollId, Timestamp};
use crate::domain::ledger::VoteLedger;
use crate::domain::poll::{Poll, PollError, PollOption};

/// Storage key holding the serialized poll collection.
pub const POLLS_KEY: &str = "polls";

/// Storage key holding the serialized vote ledger.
pub const VOTES_KEY: &str = "votes";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollRecord {
    id: String,
    question: String,
    created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_image: Option<String>,
    options: Vec<OptionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OptionRecord {
    id: String,
    text: String,
    votes: u64,
}

impl From<&Poll> for PollRecord {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id().to_string(),
            question: poll.question().to_string(),
            created_at: poll.created_at().to_iso8601(),
            creator_id: poll.creator_id().map(|c| c.to_string()),
            cover_image: poll.cover_image().map(str::to_string),
            options: poll
                .options()
                .iter()
                .map(|option| OptionRecord {
                    id: option.id().to_string(),
                    text: option.text().to_string(),
                    votes: option.votes(),
                })
                .collect(),
        }
    }
}

impl PollRecord {
    fn into_poll(self) -> Result<Poll, PollError> {
        let id = PollId::new(self.id).map_err(|e| PollError::corrupt(e.to_string()))?;

        if self.question.trim().is_empty() {
            return Err(PollError::corrupt(format!("poll {} has an empty question", id)));
        }
        if self.options.is_empty() {
            return Err(PollError::corrupt(format!("poll {} has no options", id)));
        }

        let created_at = Timestamp::parse_iso8601(&self.created_at).map_err(|e| {
            PollError::corrupt(format!("poll {} has invalid createdAt: {}", id, e))
        })?;

        let mut seen = HashSet::new();
        let mut options = Vec::with_capacity(self.options.len());
        for record in self.options {
            let option_id = OptionId::new(record.id)
                .map_err(|e| PollError::corrupt(format!("poll {}: {}", id, e)))?;
            if !seen.insert(option_id.clone()) {
                return Err(PollError::corrupt(format!(
                    "poll {} has duplicate option id {}",
                    id, option_id
                )));
            }
            if record.text.trim().is_empty() {
                return Err(PollError::corrupt(format!(
                    "option {} of poll {} has empty text",
                    option_id, id
                )));
            }
            options.push(PollOption::reconstitute(option_id, record.text, record.votes));
        }

        let poll = Poll::reconstitute(
            id,
            self.question,
            options,
            created_at,
            self.creator_id.map(CreatorId::new),
            self.cover_image,
        );
        if poll.checked_total_votes().is_none() {
            return Err(PollError::corrupt(format!(
                "poll {} has a vote total that overflows",
                poll.id()
            )));
        }
        Ok(poll)
    }
}

/// Serialize the poll collection.
pub fn encode_polls(polls: &[Poll]) -> Result<String, PollError> {
    let records: Vec<PollRecord> = polls.iter().map(PollRecord::from).collect();
    serde_json::to_string(&records).map_err(|e| PollError::persistence(e.to_string()))
}

/// Parse and validate the poll collection.
pub fn decode_polls(raw: &str) -> Result<Vec<Poll>, PollError> {
    let records: Vec<PollRecord> = serde_json::from_str(raw)
        .map_err(|e| PollError::corrupt(format!("polls: {}", e)))?;

    let mut seen = HashSet::new();
    let mut polls = Vec::with_capacity(records.len());
    for record in records {
        let poll = record.into_poll()?;
        if !seen.insert(poll.id().clone()) {
            return Err(PollError::corrupt(format!("duplicate poll id {}", poll.id())));
        }
        polls.push(poll);
    }
    Ok(polls)
}

/// Serialize the ledger as an object of pollId -> optionId.
pub fn encode_ledger(ledger: &VoteLedger) -> Result<String, PollError> {
    serde_json::to_string(ledger.entries()).map_err(|e| PollError::persistence(e.to_string()))
}

/// Parse and validate the ledger.
pub fn decode_ledger(raw: &str) -> Result<VoteLedger, PollError> {
    let entries: BTreeMap<String, String> = serde_json::from_str(raw)
        .map_err(|e| PollError::corrupt(format!("votes: {}", e)))?;

    let entries = entries
        .into_iter()
        .map(|(poll_id, option_id)| {
            let poll_id = PollId::new(poll_id).map_err(|e| PollError::corrupt(e.to_string()))?;
            let option_id =
                OptionId::new(option_id).map_err(|e| PollError::corrupt(e.to_string()))?;
            Ok((poll_id, option_id))
        })
        .collect::<Result<BTreeMap<_, _>, PollError>>()?;

    Ok(VoteLedger::from_entries(entries))
}
