//! Application services for the server catalog.

mod lifecycle;
mod store;

pub use lifecycle::{InstanceLifecycleService, InstanceLifecycleServiceError};
pub use store::{CatalogStoreError, EntityStore, StatusChange};
