//! Port contracts for loading the catalog and driving instances.

mod runtime;
mod source;

pub use runtime::{InstanceProbe, InstanceRuntime, InstanceRuntimeError, InstanceRuntimeResult};
pub use source::{CatalogSource, CatalogSourceError, CatalogSourceResult};
