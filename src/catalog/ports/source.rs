//! Source port for the startup catalog.

use crate::catalog::domain::CatalogSnapshot;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog source operations.
pub type CatalogSourceResult<T> = Result<T, CatalogSourceError>;

/// Supplies the entity collections once at session start.
///
/// Where the collections come from (a bundled fixture, a file, a remote
/// listing) is the adapter's concern.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads the complete catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError`] when the catalog cannot be read or
    /// decoded.
    async fn load(&self) -> CatalogSourceResult<CatalogSnapshot>;
}

/// Errors returned by catalog source adapters.
#[derive(Debug, Clone, Error)]
pub enum CatalogSourceError {
    /// The catalog could not be read.
    #[error("catalog could not be read: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The catalog was read but could not be decoded.
    #[error("catalog could not be decoded: {0}")]
    Malformed(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogSourceError {
    /// Wraps a read failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a decoding failure.
    pub fn malformed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Malformed(Arc::new(err))
    }
}
