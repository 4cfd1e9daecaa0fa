//! File-based Key/Value Store Adapter
//!
//! Stores each key as `<key>.json` under a base directory. Writes go to a
//! temporary sibling file first and are renamed into place, so a crash
//! mid-write leaves the previous value intact.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{KeyValueStore, StorageError};

/// File-based key/value storage
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create a new file store with a base directory
    ///
    /// The directory is created lazily on first write.
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileKeyValueStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the base directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        Self::validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }

    /// Keys become file names, so only `[A-Za-z0-9_-]` is allowed
    fn validate_key(key: &str) -> Result<(), StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(())
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                tracing::warn!(
                    "Failed to remove temporary file {}: {}",
                    tmp_path.display(),
                    cleanup
                );
            }
            return Err(StorageError::IoError(e.to_string()));
        }

        Ok(())
    }
}
