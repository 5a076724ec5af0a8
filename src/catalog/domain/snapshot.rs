//! The four entity collections loaded at session start.

use super::{Host, Profile, ServerDefinition, ServerInstance};
use serde::{Deserialize, Serialize};

/// Complete catalog contents as delivered by a
/// [`crate::catalog::ports::CatalogSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Server definitions in catalog order.
    #[serde(default)]
    pub definitions: Vec<ServerDefinition>,
    /// Server instances in catalog order.
    #[serde(default)]
    pub instances: Vec<ServerInstance>,
    /// Profiles in registration order.
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// Hosts in catalog order.
    #[serde(default)]
    pub hosts: Vec<Host>,
}
