//! PollStore - owner of the poll collection and the vote ledger.
//!
//! All writes go through a single store-wide lock and are persisted before
//! the in-memory state is replaced, so a failed write leaves both the store
//! and (as far as the port allows) the persisted data unchanged.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::foundation::{CreatorId, OptionId, PollId, Timestamp};
use crate::domain::ledger::VoteLedger;
use crate::domain::poll::{demo_polls, Poll, PollError, PollResults};
use crate::domain::ranking::{RankingCategory, RankingEngine};
use crate::ports::KeyValueStore;

use super::codec::{decode_ledger, decode_polls, encode_ledger, encode_polls, POLLS_KEY, VOTES_KEY};

/// Command to create a new poll.
#[derive(Debug, Clone, Default)]
pub struct CreatePollCommand {
    pub question: String,
    pub options: Vec<String>,
    pub cover_image: Option<String>,
    pub creator_id: Option<CreatorId>,
}

impl CreatePollCommand {
    pub fn new<I, S>(question: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            cover_image: None,
            creator_id: None,
        }
    }

    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    pub fn with_creator(mut self, creator_id: CreatorId) -> Self {
        self.creator_id = Some(creator_id);
        self
    }
}

#[derive(Debug)]
struct StoreState {
    polls: Vec<Poll>,
    ledger: VoteLedger,
}

/// Authoritative poll and vote state, backed by a key/value store.
pub struct PollStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<StoreState>,
}

impl PollStore {
    /// Load state from storage, seeding the demo polls if none exist yet.
    ///
    /// # Errors
    ///
    /// - `PersistenceFailure` if storage cannot be read, or the seed cannot be written
    /// - `CorruptState` if stored data fails validation
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self, PollError> {
        let polls = match storage.get(POLLS_KEY).await? {
            Some(raw) => decode_polls(&raw)?,
            None => {
                let seeded = demo_polls(Timestamp::now().truncated_to_millis())?;
                storage.set(POLLS_KEY, &encode_polls(&seeded)?).await?;
                tracing::info!("Seeded empty store with {} demo polls", seeded.len());
                seeded
            }
        };

        let ledger = match storage.get(VOTES_KEY).await? {
            Some(raw) => decode_ledger(&raw)?,
            None => VoteLedger::new(),
        };

        tracing::debug!(
            polls = polls.len(),
            votes = ledger.len(),
            "Poll store loaded"
        );

        Ok(Self {
            storage,
            state: RwLock::new(StoreState { polls, ledger }),
        })
    }

    /// Create a poll and persist the updated collection.
    ///
    /// # Errors
    ///
    /// - `InvalidQuestion`, `InsufficientOptions`, `TooManyOptions` on bad input
    /// - `PersistenceFailure` if the collection cannot be written; the poll is not added
    pub async fn create_poll(&self, cmd: CreatePollCommand) -> Result<Poll, PollError> {
        let mut state = self.state.write().await;

        let mut id = PollId::generate();
        while state.polls.iter().any(|p| p.id() == &id) {
            id = PollId::generate();
        }

        let poll = Poll::create(
            id,
            &cmd.question,
            &cmd.options,
            cmd.cover_image,
            cmd.creator_id,
            Timestamp::now().truncated_to_millis(),
        )?;

        let mut polls = state.polls.clone();
        polls.push(poll.clone());

        if let Err(e) = self.storage.set(POLLS_KEY, &encode_polls(&polls)?).await {
            tracing::warn!("Failed to persist new poll {}: {}", poll.id(), e);
            return Err(e.into());
        }

        state.polls = polls;
        tracing::info!(
            poll_id = %poll.id(),
            options = poll.options().len(),
            "Poll created"
        );
        Ok(poll)
    }

    /// Look up a poll by id.
    pub async fn get_poll(&self, poll_id: &PollId) -> Option<Poll> {
        let state = self.state.read().await;
        state.polls.iter().find(|p| p.id() == poll_id).cloned()
    }

    /// All polls in insertion order.
    pub async fn list_polls(&self) -> Vec<Poll> {
        self.state.read().await.polls.clone()
    }

    /// Whether the local voter has voted on the poll.
    pub async fn has_voted(&self, poll_id: &PollId) -> bool {
        self.state.read().await.ledger.has_voted(poll_id)
    }

    /// The option the local voter chose on the poll, if any.
    pub async fn voted_option(&self, poll_id: &PollId) -> Option<OptionId> {
        self.state.read().await.ledger.choice_for(poll_id).cloned()
    }

    /// Record the local voter's vote and return the updated poll.
    ///
    /// The ledger check, the increment and both writes run under the store's
    /// write lock. The poll collection is written first, then the ledger; if
    /// the ledger write fails the previous collection is written back.
    ///
    /// # Errors
    ///
    /// - `PollNotFound` if the poll does not exist
    /// - `DuplicateVote` if the voter already voted on this poll
    /// - `OptionNotFound` if the option is not part of the poll
    /// - `PersistenceFailure` if either write fails; nothing is committed
    pub async fn record_vote(
        &self,
        poll_id: &PollId,
        option_id: &OptionId,
    ) -> Result<Poll, PollError> {
        let mut state = self.state.write().await;

        let index = state
            .polls
            .iter()
            .position(|p| p.id() == poll_id)
            .ok_or_else(|| PollError::PollNotFound(poll_id.clone()))?;

        if state.ledger.has_voted(poll_id) {
            tracing::debug!("Rejected duplicate vote on poll {}", poll_id);
            return Err(PollError::DuplicateVote(poll_id.clone()));
        }

        let mut poll = state.polls[index].clone();
        poll.record_vote(option_id)?;

        let mut ledger = state.ledger.clone();
        ledger.record_choice(poll_id.clone(), option_id.clone())?;

        let mut polls = state.polls.clone();
        polls[index] = poll.clone();

        let polls_raw = encode_polls(&polls)?;
        let ledger_raw = encode_ledger(&ledger)?;

        if let Err(e) = self.storage.set(POLLS_KEY, &polls_raw).await {
            tracing::warn!("Failed to persist vote on poll {}: {}", poll_id, e);
            return Err(e.into());
        }

        if let Err(e) = self.storage.set(VOTES_KEY, &ledger_raw).await {
            tracing::warn!("Failed to persist ledger for poll {}: {}", poll_id, e);
            let previous = encode_polls(&state.polls)?;
            if let Err(restore_err) = self.storage.set(POLLS_KEY, &previous).await {
                tracing::error!(
                    "Failed to restore polls after ledger write failure: {}",
                    restore_err
                );
            }
            return Err(e.into());
        }

        state.polls = polls;
        state.ledger = ledger;

        tracing::info!(poll_id = %poll_id, option_id = %option_id, "Vote recorded");
        Ok(poll)
    }

    /// Results view for a poll.
    ///
    /// # Errors
    ///
    /// - `PollNotFound` if the poll does not exist
    pub async fn results(&self, poll_id: &PollId) -> Result<PollResults, PollError> {
        let state = self.state.read().await;
        state
            .polls
            .iter()
            .find(|p| p.id() == poll_id)
            .map(PollResults::from_poll)
            .ok_or_else(|| PollError::PollNotFound(poll_id.clone()))
    }

    /// Rank a consistent snapshot of the polls.
    pub async fn ranked(
        &self,
        engine: &RankingEngine,
        category: RankingCategory,
        limit: Option<usize>,
    ) -> Vec<Poll> {
        let state = self.state.read().await;
        engine.rank(&state.polls, category, limit)
    }

    /// Sum of votes over every option of every poll, saturating at `u64::MAX`.
    pub async fn total_votes(&self) -> u64 {
        let state = self.state.read().await;
        state
            .polls
            .iter()
            .fold(0u64, |total, poll| total.saturating_add(poll.total_votes()))
    }
}

impl std::fmt::Debug for PollStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryKeyValueStore;
    use crate::ports::StorageError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Storage whose writes to selected keys fail on demand.
    struct FlakyStorage {
        values: Mutex<HashMap<String, String>>,
        failing_keys: Mutex<Vec<String>>,
        fail_reads: bool,
    }

    impl FlakyStorage {
        fn new() -> Self {
            Self {
                values: Mutex::new(HashMap::new()),
                failing_keys: Mutex::new(Vec::new()),
                fail_reads: false,
            }
        }

        fn unreadable() -> Self {
            Self {
                fail_reads: true,
                ..Self::new()
            }
        }

        fn fail_writes_to(&self, key: &str) {
            self.failing_keys.lock().unwrap().push(key.to_string());
        }

        fn raw(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Unavailable("simulated read failure".to_string()));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing_keys.lock().unwrap().iter().any(|k| k == key) {
                return Err(StorageError::IoError("simulated write failure".to_string()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    async fn empty_store() -> (PollStore, Arc<InMemoryKeyValueStore>) {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([(POLLS_KEY, "[]")]));
        let store = PollStore::open(storage.clone()).await.unwrap();
        (store, storage)
    }

    fn favourite_colour() -> CreatePollCommand {
        CreatePollCommand::new("Favourite colour?", ["Red", "Green", "Blue"])
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Loading
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn open_seeds_and_persists_demo_polls() {
        let storage = Arc::new(InMemoryKeyValueStore::new());

        let store = PollStore::open(storage.clone()).await.unwrap();

        let polls = store.list_polls().await;
        assert_eq!(polls.len(), 2);
        let persisted = storage.get(POLLS_KEY).await.unwrap().unwrap();
        assert_eq!(decode_polls(&persisted).unwrap(), polls);
    }

    #[tokio::test]
    async fn open_does_not_reseed_existing_data() {
        let (store, storage) = empty_store().await;
        drop(store);

        let reopened = PollStore::open(storage).await.unwrap();
        assert!(reopened.list_polls().await.is_empty());
    }

    #[tokio::test]
    async fn open_rejects_corrupt_polls() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([(POLLS_KEY, "{oops")]));
        let result = PollStore::open(storage).await;
        assert!(matches!(result, Err(PollError::CorruptState(_))));
    }

    #[tokio::test]
    async fn open_rejects_corrupt_ledger() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([
            (POLLS_KEY, "[]"),
            (VOTES_KEY, "[1,2]"),
        ]));
        let result = PollStore::open(storage).await;
        assert!(matches!(result, Err(PollError::CorruptState(_))));
    }

    #[tokio::test]
    async fn open_surfaces_read_failures() {
        let result = PollStore::open(Arc::new(FlakyStorage::unreadable())).await;
        assert!(matches!(result, Err(PollError::PersistenceFailure(_))));
    }

    #[tokio::test]
    async fn open_fails_when_seed_cannot_be_written() {
        let storage = FlakyStorage::new();
        storage.fail_writes_to(POLLS_KEY);

        let result = PollStore::open(Arc::new(storage)).await;

        assert!(matches!(result, Err(PollError::PersistenceFailure(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Creation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_poll_appends_and_persists() {
        let (store, storage) = empty_store().await;

        let poll = store.create_poll(favourite_colour()).await.unwrap();

        assert_eq!(store.list_polls().await, vec![poll.clone()]);
        assert_eq!(store.get_poll(poll.id()).await, Some(poll.clone()));
        let persisted = decode_polls(&storage.get(POLLS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, vec![poll]);
    }

    #[tokio::test]
    async fn create_poll_keeps_insertion_order() {
        let (store, _) = empty_store().await;

        let first = store.create_poll(favourite_colour()).await.unwrap();
        let second = store
            .create_poll(CreatePollCommand::new("Cats or dogs?", ["Cats", "Dogs"]))
            .await
            .unwrap();

        let ids: Vec<PollId> = store.list_polls().await.iter().map(|p| p.id().clone()).collect();
        assert_eq!(ids, vec![first.id().clone(), second.id().clone()]);
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn create_poll_stores_cover_and_creator() {
        let (store, _) = empty_store().await;
        let cmd = favourite_colour()
            .with_cover_image("data:image/webp;base64,UklGR")
            .with_creator(CreatorId::new("creator-9"));

        let poll = store.create_poll(cmd).await.unwrap();

        assert_eq!(poll.cover_image(), Some("data:image/webp;base64,UklGR"));
        assert_eq!(poll.creator_id(), Some(&CreatorId::new("creator-9")));
    }

    #[tokio::test]
    async fn create_poll_validation_errors_leave_store_unchanged() {
        let (store, _) = empty_store().await;

        let eleven: Vec<String> = (1..=11).map(|i| i.to_string()).collect();
        let cases = vec![
            (CreatePollCommand::new("Q", ["A"]), "insufficient"),
            (CreatePollCommand::new("", ["A", "B"]), "question"),
            (CreatePollCommand::new("Q", eleven), "too many"),
        ];

        for (cmd, label) in cases {
            let err = store.create_poll(cmd).await.unwrap_err();
            match label {
                "insufficient" => assert!(matches!(err, PollError::InsufficientOptions { .. })),
                "question" => assert_eq!(err, PollError::InvalidQuestion),
                _ => assert!(matches!(err, PollError::TooManyOptions { .. })),
            }
        }

        assert!(store.list_polls().await.is_empty());
    }

    #[tokio::test]
    async fn create_poll_rolls_back_on_persistence_failure() {
        let storage = Arc::new(FlakyStorage::new());
        let store = PollStore::open(storage.clone()).await.unwrap();
        let before = store.list_polls().await;
        storage.fail_writes_to(POLLS_KEY);

        let result = store.create_poll(favourite_colour()).await;

        assert!(matches!(result, Err(PollError::PersistenceFailure(_))));
        assert_eq!(store.list_polls().await, before);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Voting
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn record_vote_increments_and_writes_ledger() {
        let (store, storage) = empty_store().await;
        let poll = store.create_poll(favourite_colour()).await.unwrap();
        let option = poll.options()[1].id().clone();

        let updated = store.record_vote(poll.id(), &option).await.unwrap();

        assert_eq!(updated.options()[1].votes(), 1);
        assert!(store.has_voted(poll.id()).await);
        assert_eq!(store.voted_option(poll.id()).await, Some(option.clone()));

        let ledger = decode_ledger(&storage.get(VOTES_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(ledger.choice_for(poll.id()), Some(&option));
    }

    #[tokio::test]
    async fn second_vote_is_duplicate_and_counts_once() {
        let (store, _) = empty_store().await;
        let poll = store.create_poll(favourite_colour()).await.unwrap();
        let option = poll.options()[0].id().clone();

        let first = store.record_vote(poll.id(), &option).await;
        let second = store.record_vote(poll.id(), &option).await;

        assert!(first.is_ok());
        assert_eq!(second, Err(PollError::DuplicateVote(poll.id().clone())));
        let stored = store.get_poll(poll.id()).await.unwrap();
        assert_eq!(stored.options()[0].votes(), 1);
        assert_eq!(stored.total_votes(), 1);
    }

    #[tokio::test]
    async fn switching_option_after_voting_is_refused() {
        let (store, _) = empty_store().await;
        let poll = store.create_poll(favourite_colour()).await.unwrap();

        store.record_vote(poll.id(), poll.options()[0].id()).await.unwrap();
        let result = store.record_vote(poll.id(), poll.options()[2].id()).await;

        assert!(matches!(result, Err(PollError::DuplicateVote(_))));
        assert_eq!(store.voted_option(poll.id()).await.as_ref(), Some(poll.options()[0].id()));
    }

    #[tokio::test]
    async fn vote_on_unknown_poll_is_not_found() {
        let (store, _) = empty_store().await;
        let missing = PollId::new("missing").unwrap();

        let result = store
            .record_vote(&missing, &OptionId::new("missing-1").unwrap())
            .await;

        assert_eq!(result, Err(PollError::PollNotFound(missing.clone())));
        assert!(!store.has_voted(&missing).await);
    }

    #[tokio::test]
    async fn vote_on_foreign_option_is_rejected_without_mutation() {
        let (store, _) = empty_store().await;
        let poll = store.create_poll(favourite_colour()).await.unwrap();
        let other = store
            .create_poll(CreatePollCommand::new("Cats or dogs?", ["Cats", "Dogs"]))
            .await
            .unwrap();

        let result = store.record_vote(poll.id(), other.options()[0].id()).await;

        assert!(matches!(result, Err(PollError::OptionNotFound { .. })));
        assert!(!store.has_voted(poll.id()).await);
        assert_eq!(store.total_votes().await, 0);
    }

    #[tokio::test]
    async fn failed_poll_write_commits_nothing() {
        let storage = Arc::new(FlakyStorage::new());
        let store = PollStore::open(storage.clone()).await.unwrap();
        let poll = store.list_polls().await.remove(0);
        let before_total = store.total_votes().await;
        storage.fail_writes_to(POLLS_KEY);

        let result = store.record_vote(poll.id(), poll.options()[0].id()).await;

        assert!(matches!(result, Err(PollError::PersistenceFailure(_))));
        assert!(!store.has_voted(poll.id()).await);
        assert_eq!(store.total_votes().await, before_total);
        assert!(storage.raw(VOTES_KEY).is_none());
    }

    #[tokio::test]
    async fn failed_ledger_write_restores_persisted_polls() {
        let storage = Arc::new(FlakyStorage::new());
        let store = PollStore::open(storage.clone()).await.unwrap();
        let poll = store.list_polls().await.remove(0);
        let persisted_before = storage.raw(POLLS_KEY);
        storage.fail_writes_to(VOTES_KEY);

        let result = store.record_vote(poll.id(), poll.options()[0].id()).await;

        assert!(matches!(result, Err(PollError::PersistenceFailure(_))));
        assert!(!store.has_voted(poll.id()).await);
        assert_eq!(store.get_poll(poll.id()).await, Some(poll));
        assert_eq!(storage.raw(POLLS_KEY), persisted_before);
    }

    #[tokio::test]
    async fn votes_across_polls_are_conserved() {
        let (store, _) = empty_store().await;
        let mut polls = Vec::new();
        for i in 0..4 {
            let cmd = CreatePollCommand::new(format!("Question {}", i), ["Yes", "No"]);
            polls.push(store.create_poll(cmd).await.unwrap());
        }

        for poll in &polls {
            store.record_vote(poll.id(), poll.options()[1].id()).await.unwrap();
        }

        assert_eq!(store.total_votes().await, 4);
    }

    #[tokio::test]
    async fn concurrent_duplicate_votes_count_once() {
        let (store, _) = empty_store().await;
        let store = Arc::new(store);
        let poll = store.create_poll(favourite_colour()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let poll_id = poll.id().clone();
            let option_id = poll.options()[0].id().clone();
            handles.push(tokio::spawn(async move {
                store.record_vote(&poll_id, &option_id).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, PollError::DuplicateVote(_))),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.total_votes().await, 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Reads
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn results_reflect_votes() {
        let (store, _) = empty_store().await;
        let poll = store.create_poll(favourite_colour()).await.unwrap();
        store.record_vote(poll.id(), poll.options()[2].id()).await.unwrap();

        let results = store.results(poll.id()).await.unwrap();

        assert_eq!(results.total_votes, 1);
        assert_eq!(results.options[2].percentage, 100.0);
        assert_eq!(results.leaders, vec![poll.options()[2].id().clone()]);
    }

    #[tokio::test]
    async fn results_for_unknown_poll_is_not_found() {
        let (store, _) = empty_store().await;
        let result = store.results(&PollId::new("nope").unwrap()).await;
        assert!(matches!(result, Err(PollError::PollNotFound(_))));
    }

    #[tokio::test]
    async fn ranked_uses_current_snapshot() {
        let (store, _) = empty_store().await;
        let quiet = store.create_poll(favourite_colour()).await.unwrap();
        let busy = store
            .create_poll(CreatePollCommand::new("Cats or dogs?", ["Cats", "Dogs"]))
            .await
            .unwrap();
        store.record_vote(busy.id(), busy.options()[0].id()).await.unwrap();

        let engine = RankingEngine::seeded(3);
        let trending = store.ranked(&engine, RankingCategory::Trending, None).await;
        let featured = store.ranked(&engine, RankingCategory::Featured, None).await;

        assert_eq!(trending[0].id(), busy.id());
        assert_eq!(trending[1].id(), quiet.id());
        assert_eq!(featured.len(), 1);
    }

    #[tokio::test]
    async fn open_rejects_overflowing_vote_counts() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([(
            POLLS_KEY,
            r#"[{"id":"1","question":"Q","createdAt":"2024-01-15T10:30:00Z",
                "options":[{"id":"a","text":"A","votes":18446744073709551615},
                           {"id":"b","text":"B","votes":1}]}]"#,
        )]));

        let result = PollStore::open(storage).await;

        assert!(matches!(result, Err(PollError::CorruptState(_))));
    }

    #[tokio::test]
    async fn vote_on_poll_at_maximum_total_is_refused_without_mutation() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([(
            POLLS_KEY,
            r#"[{"id":"1","question":"Q","createdAt":"2024-01-15T10:30:00Z",
                "options":[{"id":"a","text":"A","votes":18446744073709551614},
                           {"id":"b","text":"B","votes":1}]}]"#,
        )]));
        let store = PollStore::open(storage.clone()).await.unwrap();
        let poll_id = PollId::new("1").unwrap();

        let result = store
            .record_vote(&poll_id, &OptionId::new("a").unwrap())
            .await;

        assert!(matches!(result, Err(PollError::CorruptState(_))));
        assert!(!store.has_voted(&poll_id).await);
        assert_eq!(store.total_votes().await, u64::MAX);
        assert!(storage.get(VOTES_KEY).await.unwrap().is_none());

        let featured = store
            .ranked(&RankingEngine::seeded(1), RankingCategory::Featured, None)
            .await;
        assert_eq!(featured.len(), 1);
    }
}
