//! In-memory catalog source backed by a fixed snapshot.

use crate::catalog::{
    domain::CatalogSnapshot,
    ports::{CatalogSource, CatalogSourceResult},
};
use async_trait::async_trait;

/// Catalog source that hands out a copy of a bundled snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    snapshot: CatalogSnapshot,
}

impl StaticCatalogSource {
    /// Creates a source serving `snapshot` on every load.
    #[must_use]
    pub const fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn load(&self) -> CatalogSourceResult<CatalogSnapshot> {
        Ok(self.snapshot.clone())
    }
}
