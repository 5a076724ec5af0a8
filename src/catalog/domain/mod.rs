//! Domain model for the server catalog.
//!
//! The catalog domain models server definitions, their instances, the
//! profiles that bundle instances, and the hosts that consume profiles.
//! Relationships between entities are held by identifier only.

mod definition;
mod error;
mod host;
mod ids;
mod instance;
mod profile;
mod snapshot;

pub use definition::{EndpointKind, ServerDefinition};
pub use error::{
    CatalogDomainError, CatalogIntegrityError, ParseEndpointKindError, ParseHostKindError,
    ParseHostStatusError, ParseInstanceStatusError,
};
pub use host::{Host, HostKind, HostStatus, HostSummary};
pub use ids::{DefinitionId, HostId, InstanceId, ProfileId};
pub use instance::{InstanceStatus, ServerInstance};
pub use profile::Profile;
pub use snapshot::CatalogSnapshot;
