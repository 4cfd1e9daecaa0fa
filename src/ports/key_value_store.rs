//! Key/Value Store Port - Interface for durable string storage.
//!
//! The poll store keeps its whole state under a handful of string keys and
//! reads/writes them through this port. Implementations are expected to be
//! fast and local; callers do not retry.

use async_trait::async_trait;

use crate::domain::poll::PollError;

/// Errors that can occur during key/value storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for PollError {
    fn from(err: StorageError) -> Self {
        PollError::PersistenceFailure(err.to_string())
    }
}

/// Port for a durable string-keyed store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// `None` if nothing has been stored under the key
    ///
    /// # Errors
    /// Returns `StorageError` if the read fails
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns `StorageError` if the write fails
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
