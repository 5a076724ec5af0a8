//! Error types for catalog domain validation and parsing.

use super::{DefinitionId, HostId, InstanceId, ProfileId};
use thiserror::Error;

/// Errors returned while constructing or mutating catalog domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// An identifier is empty after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// A display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// Instance connection details are empty after trimming.
    #[error("connection details for instance {0} must not be empty")]
    EmptyConnection(InstanceId),

    /// Transitioning between two instance statuses is invalid.
    #[error("invalid instance status transition for {instance_id}: {from} -> {to}")]
    InvalidStatusTransition {
        /// Instance whose status was being changed.
        instance_id: InstanceId,
        /// Current status.
        from: String,
        /// Requested target status.
        to: String,
    },
}

/// Errors raised when a loaded catalog violates entity relationships.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogIntegrityError {
    /// An instance references a definition that is not in the catalog.
    #[error("instance {instance_id} references unknown definition {definition_id}")]
    UnknownDefinition {
        /// Offending instance.
        instance_id: InstanceId,
        /// Definition identifier that failed to resolve.
        definition_id: DefinitionId,
    },

    /// Two definitions share an identifier.
    #[error("duplicate definition identifier: {0}")]
    DuplicateDefinition(DefinitionId),

    /// Two instances share an identifier.
    #[error("duplicate instance identifier: {0}")]
    DuplicateInstance(InstanceId),

    /// Two profiles share an identifier.
    #[error("duplicate profile identifier: {0}")]
    DuplicateProfile(ProfileId),

    /// Two hosts share an identifier.
    #[error("duplicate host identifier: {0}")]
    DuplicateHost(HostId),
}

/// Error returned while parsing an endpoint kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown endpoint kind: {0}")]
pub struct ParseEndpointKindError(pub String);

/// Error returned while parsing an instance status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown instance status: {0}")]
pub struct ParseInstanceStatusError(pub String);

/// Error returned while parsing a host status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown host status: {0}")]
pub struct ParseHostStatusError(pub String);

/// Error returned while parsing a host kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown host kind: {0}")]
pub struct ParseHostKindError(pub String);
