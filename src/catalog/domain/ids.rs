//! Identifier types for catalog entities.
//!
//! Catalog identifiers are opaque strings supplied by whatever loaded the
//! catalog (a static fixture or a remote listing). They are trimmed and must
//! not be empty; no other shape is imposed.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

fn normalize_identifier(
    value: impl Into<String>,
    entity: &'static str,
) -> Result<String, CatalogDomainError> {
    let normalized = value.into().trim().to_owned();
    if normalized.is_empty() {
        return Err(CatalogDomainError::EmptyIdentifier(entity));
    }
    Ok(normalized)
}

/// Identifier of a server definition (a catalog entry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DefinitionId(String);

impl DefinitionId {
    /// Creates a validated definition identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        normalize_identifier(value, "definition").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DefinitionId {
    type Error = CatalogDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DefinitionId> for String {
    fn from(value: DefinitionId) -> Self {
        value.0
    }
}

impl AsRef<str> for DefinitionId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of a server instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstanceId(String);

impl InstanceId {
    /// Creates a validated instance identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        normalize_identifier(value, "instance").map(Self)
    }

    /// Generates a fresh identifier for a newly instantiated definition.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("instance-{}", Uuid::new_v4()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InstanceId {
    type Error = CatalogDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InstanceId> for String {
    fn from(value: InstanceId) -> Self {
        value.0
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileId(String);

impl ProfileId {
    /// Creates a validated profile identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        normalize_identifier(value, "profile").map(Self)
    }

    /// Parses an optional binding target where the empty string means
    /// "unbound".
    #[must_use]
    pub fn optional(value: &str) -> Option<Self> {
        Self::new(value).ok()
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProfileId {
    type Error = CatalogDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileId> for String {
    fn from(value: ProfileId) -> Self {
        value.0
    }
}

impl AsRef<str> for ProfileId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of a host application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostId(String);

impl HostId {
    /// Creates a validated host identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        normalize_identifier(value, "host").map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HostId {
    type Error = CatalogDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HostId> for String {
    fn from(value: HostId) -> Self {
        value.0
    }
}

impl AsRef<str> for HostId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
