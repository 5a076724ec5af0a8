//! Server instances: concrete instantiations of a server definition.

use super::{CatalogDomainError, DefinitionId, InstanceId, ParseInstanceStatusError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle status of a server instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Instance is up and serving requests.
    Running,
    /// Instance is not running.
    Stopped,
    /// Instance is being brought up.
    Connecting,
    /// Instance failed to start or crashed.
    Error,
}

impl InstanceStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Connecting => "connecting",
            Self::Error => "error",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Stopped | Self::Error, Self::Connecting)
                | (Self::Connecting, Self::Running | Self::Stopped | Self::Error)
                | (Self::Running, Self::Stopped | Self::Error)
                | (Self::Error, Self::Stopped)
        )
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InstanceStatus {
    type Error = ParseInstanceStatusError;

    fn try_from(value: &str) -> Result<Self, ParseInstanceStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            "connecting" => Ok(Self::Connecting),
            "error" => Ok(Self::Error),
            _ => Err(ParseInstanceStatusError(value.to_owned())),
        }
    }
}

/// A concrete instantiation of a [`super::ServerDefinition`].
///
/// `connection` holds the launch command for stdio definitions and the
/// endpoint URL for SSE definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInstance {
    id: InstanceId,
    name: String,
    definition_id: DefinitionId,
    status: InstanceStatus,
    connection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    env: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arguments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl ServerInstance {
    /// Creates a stopped instance of a definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when the name or connection details are
    /// empty after trimming.
    pub fn new(
        id: InstanceId,
        name: impl Into<String>,
        definition_id: DefinitionId,
        connection: impl Into<String>,
    ) -> Result<Self, CatalogDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(CatalogDomainError::EmptyDisplayName);
        }

        let normalized_connection = connection.into().trim().to_owned();
        if normalized_connection.is_empty() {
            return Err(CatalogDomainError::EmptyConnection(id));
        }

        Ok(Self {
            id,
            name: normalized_name,
            definition_id,
            status: InstanceStatus::Stopped,
            connection: normalized_connection,
            request_count: None,
            env: None,
            arguments: None,
            last_error: None,
            updated_at: None,
        })
    }

    /// Replaces the environment mapping passed to the server.
    #[must_use]
    pub fn with_env(mut self, values: impl IntoIterator<Item = (String, String)>) -> Self {
        let env: BTreeMap<String, String> = values.into_iter().collect();
        self.env = (!env.is_empty()).then_some(env);
        self
    }

    /// Sets the argument string appended to the launch command.
    #[must_use]
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        let normalized = arguments.into().trim().to_owned();
        self.arguments = (!normalized.is_empty()).then_some(normalized);
        self
    }

    /// Sets the initial status without transition checks.
    ///
    /// Intended for fixtures and loaders describing already-running state.
    #[must_use]
    pub const fn with_status(mut self, status: InstanceStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> &InstanceId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identifier of the owning definition.
    #[must_use]
    pub const fn definition_id(&self) -> &DefinitionId {
        &self.definition_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> InstanceStatus {
        self.status
    }

    /// Returns the launch command or endpoint URL.
    #[must_use]
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// Returns the number of requests served, when tracked.
    #[must_use]
    pub const fn request_count(&self) -> Option<u64> {
        self.request_count
    }

    /// Returns the environment mapping, when set.
    #[must_use]
    pub const fn env(&self) -> Option<&BTreeMap<String, String>> {
        self.env.as_ref()
    }

    /// Returns the argument string, when set.
    #[must_use]
    pub fn arguments(&self) -> Option<&str> {
        self.arguments.as_deref()
    }

    /// Returns the last failure message while in the `error` status.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the timestamp of the last status change.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Moves the instance into `connecting`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidStatusTransition`] when the
    /// transition is not allowed.
    pub fn mark_connecting(&mut self, clock: &impl Clock) -> Result<(), CatalogDomainError> {
        self.transition_to(InstanceStatus::Connecting, clock)
    }

    /// Moves the instance into `running`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidStatusTransition`] when the
    /// transition is not allowed.
    pub fn mark_running(&mut self, clock: &impl Clock) -> Result<(), CatalogDomainError> {
        self.transition_to(InstanceStatus::Running, clock)
    }

    /// Moves the instance into `stopped`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidStatusTransition`] when the
    /// transition is not allowed.
    pub fn mark_stopped(&mut self, clock: &impl Clock) -> Result<(), CatalogDomainError> {
        self.transition_to(InstanceStatus::Stopped, clock)
    }

    /// Moves the instance into `error` and records the failure message.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidStatusTransition`] when the
    /// transition is not allowed.
    pub fn mark_error(
        &mut self,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        self.transition_to(InstanceStatus::Error, clock)?;
        let normalized = message.into().trim().to_owned();
        self.last_error = (!normalized.is_empty()).then_some(normalized);
        Ok(())
    }

    /// Adds served requests to the counter, starting it when untracked.
    pub fn record_requests(&mut self, count: u64) {
        let current = self.request_count.unwrap_or_default();
        self.request_count = Some(current.saturating_add(count));
    }

    fn transition_to(
        &mut self,
        target: InstanceStatus,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(CatalogDomainError::InvalidStatusTransition {
                instance_id: self.id.clone(),
                from: self.status.as_str().to_owned(),
                to: target.as_str().to_owned(),
            });
        }

        self.status = target;
        self.last_error = None;
        self.updated_at = Some(clock.utc());
        Ok(())
    }
}
