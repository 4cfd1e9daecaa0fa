//! Poll aggregate entity.
//!
//! A poll is a question with a fixed, ordered list of options. Once created
//! only the per-option vote counters change.

use crate::domain::foundation::{CreatorId, OptionId, PollId, Timestamp};

use super::PollError;

/// Minimum number of non-empty options a new poll needs.
pub const MIN_OPTIONS: usize = 2;

/// Maximum number of options a new poll may have.
pub const MAX_OPTIONS: usize = 10;

/// One selectable answer within a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    id: OptionId,
    text: String,
    votes: u64,
}

impl PollOption {
    /// Reconstitute an option from persistence.
    pub fn reconstitute(id: OptionId, text: String, votes: u64) -> Self {
        Self { id, text, votes }
    }

    pub fn id(&self) -> &OptionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }
}

/// Poll aggregate.
///
/// # Invariants
///
/// - `question` is non-empty
/// - option ids are unique within the poll
/// - options never change order or count after creation
/// - new polls have between `MIN_OPTIONS` and `MAX_OPTIONS` options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    id: PollId,
    question: String,
    options: Vec<PollOption>,
    created_at: Timestamp,
    creator_id: Option<CreatorId>,
    cover_image: Option<String>,
}

impl Poll {
    /// Create a new poll with all vote counts at zero.
    ///
    /// The question and option texts are trimmed and blank options are
    /// dropped before the option count is checked. The cover image is kept
    /// verbatim.
    ///
    /// # Errors
    ///
    /// - `InvalidQuestion` if the question is blank
    /// - `TooManyOptions` if more than `MAX_OPTIONS` non-blank options remain
    /// - `InsufficientOptions` if fewer than `MIN_OPTIONS` non-blank options remain
    pub fn create<I, S>(
        id: PollId,
        question: &str,
        options: I,
        cover_image: Option<String>,
        creator_id: Option<CreatorId>,
        created_at: Timestamp,
    ) -> Result<Self, PollError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(PollError::InvalidQuestion);
        }

        let texts: Vec<String> = options
            .into_iter()
            .map(|text| text.as_ref().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();

        if texts.len() > MAX_OPTIONS {
            return Err(PollError::TooManyOptions {
                provided: texts.len(),
                max: MAX_OPTIONS,
            });
        }
        if texts.len() < MIN_OPTIONS {
            return Err(PollError::InsufficientOptions {
                provided: texts.len(),
                min: MIN_OPTIONS,
            });
        }

        let options = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| PollOption {
                id: OptionId::for_position(&id, index),
                text,
                votes: 0,
            })
            .collect();

        Ok(Self {
            id,
            question: question.to_string(),
            options,
            created_at,
            creator_id,
            cover_image,
        })
    }

    /// Reconstitute a poll from persistence (no validation).
    pub fn reconstitute(
        id: PollId,
        question: String,
        options: Vec<PollOption>,
        created_at: Timestamp,
        creator_id: Option<CreatorId>,
        cover_image: Option<String>,
    ) -> Self {
        Self {
            id,
            question,
            options,
            created_at,
            creator_id,
            cover_image,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &PollId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn creator_id(&self) -> Option<&CreatorId> {
        self.creator_id.as_ref()
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    /// Looks up an option by id.
    pub fn option(&self, option_id: &OptionId) -> Option<&PollOption> {
        self.options.iter().find(|option| &option.id == option_id)
    }

    /// Sum of votes over all options, saturating at `u64::MAX`.
    pub fn total_votes(&self) -> u64 {
        self.options
            .iter()
            .fold(0u64, |total, option| total.saturating_add(option.votes))
    }

    /// Sum of votes over all options, or `None` if it does not fit in a `u64`.
    pub fn checked_total_votes(&self) -> Option<u64> {
        self.options
            .iter()
            .try_fold(0u64, |total, option| total.checked_add(option.votes))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Increment the given option's vote count by one.
    ///
    /// Returns the option's new count. Does not consult the vote ledger;
    /// duplicate protection lives in the store.
    ///
    /// # Errors
    ///
    /// - `OptionNotFound` if the option is not part of this poll
    /// - `CorruptState` if the poll's total would no longer fit in a `u64`
    pub fn record_vote(&mut self, option_id: &OptionId) -> Result<u64, PollError> {
        let index = self
            .options
            .iter()
            .position(|option| &option.id == option_id)
            .ok_or_else(|| PollError::OptionNotFound {
                poll_id: self.id.clone(),
                option_id: option_id.clone(),
            })?;

        if self.checked_total_votes().and_then(|t| t.checked_add(1)).is_none() {
            return Err(PollError::corrupt(format!(
                "vote count of poll {} is at its maximum",
                self.id
            )));
        }

        let option = &mut self.options[index];
        option.votes += 1;
        Ok(option.votes)
    }
}
