//! Onboarding flag service.

use super::domain::OnboardingFlag;
use super::ports::{KeyValueStore, KeyValueStoreResult};
use std::sync::Arc;

const SEEN: &str = "true";

/// Reads and records which onboarding flows the user has seen.
#[derive(Clone)]
pub struct OnboardingService<S>
where
    S: KeyValueStore,
{
    store: Arc<S>,
    key_prefix: String,
}

impl<S> OnboardingService<S>
where
    S: KeyValueStore,
{
    /// Creates a service storing flags under `key_prefix`.
    #[must_use]
    pub fn new(store: Arc<S>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Returns whether the user has seen `flag`.
    ///
    /// Anything other than a stored `"true"`, including an unreadable store,
    /// counts as not seen.
    pub async fn has_seen(&self, flag: OnboardingFlag) -> bool {
        match self.store.get(&flag.storage_key(&self.key_prefix)).await {
            Ok(value) => value.as_deref() == Some(SEEN),
            Err(err) => {
                tracing::warn!(flag = %flag, error = %err, "onboarding flag unreadable");
                false
            }
        }
    }

    /// Records that the user has seen `flag`.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the key-value store.
    pub async fn mark_seen(&self, flag: OnboardingFlag) -> KeyValueStoreResult<()> {
        self.store
            .set(&flag.storage_key(&self.key_prefix), SEEN)
            .await?;
        tracing::debug!(flag = %flag, "onboarding flag set");
        Ok(())
    }

    /// Forgets that the user has seen `flag`.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the key-value store.
    pub async fn reset(&self, flag: OnboardingFlag) -> KeyValueStoreResult<()> {
        self.store.remove(&flag.storage_key(&self.key_prefix)).await
    }

    /// Forgets every onboarding flag.
    ///
    /// # Errors
    ///
    /// Returns the first storage error from the key-value store.
    pub async fn reset_all(&self) -> KeyValueStoreResult<()> {
        for flag in OnboardingFlag::ALL {
            self.reset(flag).await?;
        }
        Ok(())
    }
}
