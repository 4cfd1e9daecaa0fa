//! In-Memory Key/Value Store Adapter
//!
//! Keeps values in a map for the lifetime of the process.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStore, StorageError};

/// In-memory key/value storage
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.values.write().await.clear();
    }

    /// Get the number of stored keys
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Check whether nothing has been stored
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
