//! In-memory key-value store.

use crate::onboarding::ports::{KeyValueStore, KeyValueStoreError, KeyValueStoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> KeyValueStoreError {
    KeyValueStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> KeyValueStoreResult<Option<String>> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> KeyValueStoreResult<()> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> KeyValueStoreResult<()> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
