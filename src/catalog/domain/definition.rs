//! Server definitions: immutable catalog entries describing a kind of MCP
//! server.

use super::{CatalogDomainError, DefinitionId, ParseEndpointKindError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport an MCP server definition is reached over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Local process speaking MCP over standard input and output.
    Stdio,
    /// Remote server speaking MCP over HTTP server-sent events.
    Sse,
}

impl EndpointKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EndpointKind {
    type Error = ParseEndpointKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "stdio" => Ok(Self::Stdio),
            "sse" => Ok(Self::Sse),
            _ => Err(ParseEndpointKindError(value.to_owned())),
        }
    }
}

/// Catalog entry describing a kind of MCP server.
///
/// Definitions are never mutated once loaded; running things are modelled by
/// [`super::ServerInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDefinition {
    id: DefinitionId,
    name: String,
    endpoint: EndpointKind,
    version: String,
    #[serde(default)]
    description: String,
}

impl ServerDefinition {
    /// Creates a server definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyDisplayName`] when `name` is empty
    /// after trimming.
    pub fn new(
        id: DefinitionId,
        name: impl Into<String>,
        endpoint: EndpointKind,
        version: impl Into<String>,
    ) -> Result<Self, CatalogDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(CatalogDomainError::EmptyDisplayName);
        }

        Ok(Self {
            id,
            name: normalized_name,
            endpoint,
            version: version.into().trim().to_owned(),
            description: String::new(),
        })
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Returns the definition identifier.
    #[must_use]
    pub const fn id(&self) -> &DefinitionId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the transport kind.
    #[must_use]
    pub const fn endpoint(&self) -> EndpointKind {
        self.endpoint
    }

    /// Returns the version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}
