//! Hosts: external applications that consume a profile's configuration.

use super::{CatalogDomainError, HostId, ParseHostKindError, ParseHostStatusError, ProfileId};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Reachability of a host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostStatus {
    /// Host is reachable.
    Connected,
    /// Host is not reachable, or its status was never reported.
    Disconnected,
    /// Host is being contacted.
    Connecting,
}

impl HostStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HostStatus {
    type Error = ParseHostStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "connected" => Ok(Self::Connected),
            "disconnected" => Ok(Self::Disconnected),
            "connecting" => Ok(Self::Connecting),
            _ => Err(ParseHostStatusError(value.to_owned())),
        }
    }
}

/// Application family of a host, used to locate its configuration file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    /// Claude desktop application.
    ClaudeDesktop,
    /// Cursor editor.
    Cursor,
    /// Windsurf editor.
    Windsurf,
    /// Any other MCP-capable application.
    #[default]
    Custom,
}

impl HostKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClaudeDesktop => "claude_desktop",
            Self::Cursor => "cursor",
            Self::Windsurf => "windsurf",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HostKind {
    type Error = ParseHostKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "claude_desktop" => Ok(Self::ClaudeDesktop),
            "cursor" => Ok(Self::Cursor),
            "windsurf" => Ok(Self::Windsurf),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseHostKindError(value.to_owned())),
        }
    }
}

/// An external application bound to at most one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    id: HostId,
    name: String,
    #[serde(default)]
    kind: HostKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<HostStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_binding",
        skip_serializing_if = "Option::is_none"
    )]
    profile_id: Option<ProfileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
}

fn deserialize_binding<'de, D>(deserializer: D) -> Result<Option<ProfileId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ProfileId::optional))
}

/// Read-only projection of a host for selection lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSummary {
    /// Host identifier.
    pub id: HostId,
    /// Display name.
    pub name: String,
    /// Reachability, defaulting to `disconnected` when never reported.
    pub status: HostStatus,
}

impl Host {
    /// Creates an unbound host with no reported status.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyDisplayName`] when `name` is empty
    /// after trimming.
    pub fn new(
        id: HostId,
        name: impl Into<String>,
        kind: HostKind,
    ) -> Result<Self, CatalogDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(CatalogDomainError::EmptyDisplayName);
        }

        Ok(Self {
            id,
            name: normalized_name,
            kind,
            status: None,
            profile_id: None,
            config_path: None,
        })
    }

    /// Sets the initially bound profile.
    #[must_use]
    pub fn with_profile(mut self, profile_id: ProfileId) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    /// Sets the reported status.
    #[must_use]
    pub const fn with_status(mut self, status: HostStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Overrides the configuration file location for this host.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        let normalized = path.into().trim().to_owned();
        self.config_path = (!normalized.is_empty()).then_some(normalized);
        self
    }

    /// Returns the host identifier.
    #[must_use]
    pub const fn id(&self) -> &HostId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the application family.
    #[must_use]
    pub const fn kind(&self) -> HostKind {
        self.kind
    }

    /// Returns the reported status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<HostStatus> {
        self.status
    }

    /// Returns the bound profile identifier, if any.
    #[must_use]
    pub const fn profile_id(&self) -> Option<&ProfileId> {
        self.profile_id.as_ref()
    }

    /// Returns the configuration path override, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    /// Projects the host into a selection-list summary.
    #[must_use]
    pub fn summary(&self) -> HostSummary {
        HostSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status.unwrap_or(HostStatus::Disconnected),
        }
    }

    pub(crate) fn set_profile(&mut self, profile_id: Option<ProfileId>) {
        self.profile_id = profile_id;
    }

    pub(crate) const fn set_status(&mut self, status: HostStatus) {
        self.status = Some(status);
    }
}
