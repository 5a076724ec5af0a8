//! Error types for binding mutations.

use crate::catalog::domain::{HostId, InstanceId, ProfileId};
use thiserror::Error;

/// A binding mutation named an entity that does not exist.
///
/// Rejected mutations leave every binding, profile, and drift record
/// unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingError {
    /// No host exists with the given identifier.
    #[error("host {0} not found")]
    UnknownHost(HostId),

    /// No profile exists with the given identifier.
    #[error("profile {0} not found")]
    UnknownProfile(ProfileId),

    /// No instance exists with the given identifier.
    #[error("instance {0} not found")]
    UnknownInstance(InstanceId),

    /// A profile with the given identifier already exists.
    #[error("profile {0} already exists")]
    DuplicateProfile(ProfileId),
}
