//! Catalog source reading a JSON fixture from disk.

use crate::catalog::{
    domain::CatalogSnapshot,
    ports::{CatalogSource, CatalogSourceError, CatalogSourceResult},
};
use crate::fs_utils;
use async_trait::async_trait;
use camino::Utf8PathBuf;

/// Catalog source that decodes a [`CatalogSnapshot`] from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileCatalogSource {
    path: Utf8PathBuf,
}

impl JsonFileCatalogSource {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalogSource {
    async fn load(&self) -> CatalogSourceResult<CatalogSnapshot> {
        let path = self.path.clone();
        let contents = tokio::task::spawn_blocking(move || fs_utils::read_to_string(&path))
            .await
            .map_err(CatalogSourceError::unavailable)?
            .map_err(CatalogSourceError::unavailable)?;

        let snapshot: CatalogSnapshot =
            serde_json::from_str(&contents).map_err(CatalogSourceError::malformed)?;
        tracing::debug!(
            path = %self.path,
            definitions = snapshot.definitions.len(),
            instances = snapshot.instances.len(),
            profiles = snapshot.profiles.len(),
            hosts = snapshot.hosts.len(),
            "catalog loaded from file"
        );
        Ok(snapshot)
    }
}
