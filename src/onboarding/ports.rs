//! Key-value storage port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for key-value store operations.
pub type KeyValueStoreResult<T> = Result<T, KeyValueStoreError>;

/// String-keyed, string-valued storage, equivalent to browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`.
    async fn get(&self, key: &str) -> KeyValueStoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> KeyValueStoreResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> KeyValueStoreResult<()>;
}

/// Errors returned by key-value store adapters.
#[derive(Debug, Clone, Error)]
pub enum KeyValueStoreError {
    /// The stored data could not be decoded.
    #[error("stored data is corrupt: {0}")]
    Corrupt(Arc<dyn std::error::Error + Send + Sync>),

    /// Storage-layer failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl KeyValueStoreError {
    /// Wraps a decoding failure.
    pub fn corrupt(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Corrupt(Arc::new(err))
    }

    /// Wraps a storage-layer failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
