//! Key-value store persisted as a single JSON object on disk.

use crate::fs_utils;
use crate::onboarding::ports::{KeyValueStore, KeyValueStoreError, KeyValueStoreResult};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key-value store backed by a JSON file.
///
/// A missing file reads as an empty store. Writes replace the whole file
/// atomically, and access within one process is serialized.
#[derive(Debug, Clone)]
pub struct JsonFileKeyValueStore {
    path: Utf8PathBuf,
    lock: Arc<Mutex<()>>,
}

type Entries = BTreeMap<String, String>;

impl JsonFileKeyValueStore {
    /// Creates a store persisted at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    async fn modify(
        &self,
        change: impl FnOnce(&mut Entries) + Send + 'static,
    ) -> KeyValueStoreResult<()> {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);
        tokio::task::spawn_blocking(move || {
            let _guard = acquire(&lock)?;
            let mut entries = read_entries(&path)?;
            change(&mut entries);
            let contents =
                serde_json::to_string_pretty(&entries).map_err(KeyValueStoreError::storage)?;
            fs_utils::write(&path, &contents).map_err(KeyValueStoreError::storage)
        })
        .await
        .map_err(KeyValueStoreError::storage)?
    }
}

fn acquire(lock: &Mutex<()>) -> KeyValueStoreResult<MutexGuard<'_, ()>> {
    lock.lock()
        .map_err(|err| KeyValueStoreError::storage(std::io::Error::other(err.to_string())))
}

fn read_entries(path: &Utf8Path) -> KeyValueStoreResult<Entries> {
    let Some(contents) = fs_utils::read_optional(path).map_err(KeyValueStoreError::storage)? else {
        return Ok(Entries::new());
    };
    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }
    serde_json::from_str(&contents).map_err(KeyValueStoreError::corrupt)
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> KeyValueStoreResult<Option<String>> {
        let path = self.path.clone();
        let lock = Arc::clone(&self.lock);
        let mut entries = tokio::task::spawn_blocking(move || {
            let _guard = acquire(&lock)?;
            read_entries(&path)
        })
        .await
        .map_err(KeyValueStoreError::storage)??;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> KeyValueStoreResult<()> {
        let owned_key = key.to_owned();
        let owned_value = value.to_owned();
        self.modify(move |entries| {
            entries.insert(owned_key, owned_value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> KeyValueStoreResult<()> {
        let owned_key = key.to_owned();
        self.modify(move |entries| {
            entries.remove(&owned_key);
        })
        .await
    }
}
