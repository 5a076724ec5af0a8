//! Installation phase state machine.

use crate::catalog::{
    domain::{DefinitionId, InstanceId, ProfileId, ServerInstance},
    services::{CatalogStoreError, EntityStore},
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by installation flow transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstallationError {
    /// The selected definition is not in the catalog.
    #[error("definition {0} not found")]
    UnknownDefinition(DefinitionId),

    /// The action is not valid in the current phase.
    #[error("cannot {action} while {phase}")]
    InvalidPhase {
        /// Current phase name.
        phase: &'static str,
        /// Attempted action.
        action: &'static str,
    },

    /// The instance could not be created.
    #[error(transparent)]
    Store(#[from] CatalogStoreError),
}

/// User-supplied settings for the instance being installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceDraft {
    /// Display name of the new instance.
    pub name: String,
    /// Launch command or endpoint URL.
    pub connection: String,
    /// Extra launch arguments.
    pub arguments: Option<String>,
    /// Environment passed to the server.
    pub env: BTreeMap<String, String>,
    /// Profile the instance should join once installed.
    pub target_profile: Option<ProfileId>,
}

impl InstanceDraft {
    /// Creates a draft with a name and connection details.
    #[must_use]
    pub fn new(name: impl Into<String>, connection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connection: connection.into(),
            ..Self::default()
        }
    }

    /// Sets the launch arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Requests that the instance join `profile_id` after installation.
    #[must_use]
    pub fn into_profile(mut self, profile_id: ProfileId) -> Self {
        self.target_profile = Some(profile_id);
        self
    }
}

/// Phase of an installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InstallationPhase {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// A definition was picked.
    Selected {
        /// Chosen definition.
        definition_id: DefinitionId,
    },
    /// The user is filling in instance settings.
    Configuring {
        /// Chosen definition.
        definition_id: DefinitionId,
        /// Settings entered so far.
        draft: InstanceDraft,
    },
    /// The instance was created.
    Installed {
        /// Created instance.
        instance_id: InstanceId,
        /// Profile the instance joined, if any.
        profile_id: Option<ProfileId>,
    },
    /// Installation failed.
    Failed {
        /// Definition that was being installed.
        definition_id: DefinitionId,
        /// What went wrong.
        reason: String,
    },
}

impl InstallationPhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selected { .. } => "selected",
            Self::Configuring { .. } => "configuring",
            Self::Installed { .. } => "installed",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Drives one installation from definition choice to a stored instance.
#[derive(Debug, Clone, Default)]
pub struct InstallationFlow {
    phase: InstallationPhase,
}

impl InstallationFlow {
    /// Creates an idle flow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> &InstallationPhase {
        &self.phase
    }

    /// Picks the definition to install.
    ///
    /// Allowed from every phase except `configuring`, which must be reset
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationError::UnknownDefinition`] when the definition
    /// is not in `store`, or [`InstallationError::InvalidPhase`].
    pub fn select(
        &mut self,
        store: &EntityStore,
        definition_id: DefinitionId,
    ) -> Result<(), InstallationError> {
        if matches!(self.phase, InstallationPhase::Configuring { .. }) {
            return Err(self.invalid("select a definition"));
        }
        if store.get_definition(&definition_id).is_none() {
            return Err(InstallationError::UnknownDefinition(definition_id));
        }

        self.phase = InstallationPhase::Selected { definition_id };
        Ok(())
    }

    /// Enters or updates the instance settings.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationError::InvalidPhase`] unless a definition is
    /// selected or being configured.
    pub fn configure(&mut self, draft: InstanceDraft) -> Result<(), InstallationError> {
        let definition_id = match &self.phase {
            InstallationPhase::Selected { definition_id }
            | InstallationPhase::Configuring { definition_id, .. } => definition_id.clone(),
            _ => return Err(self.invalid("configure")),
        };

        self.phase = InstallationPhase::Configuring {
            definition_id,
            draft,
        };
        Ok(())
    }

    /// Creates the configured instance in `store`.
    ///
    /// Validation or store failures move the flow to `failed` and are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationError::InvalidPhase`] unless configuring, or
    /// [`InstallationError::Store`] when the instance is rejected.
    pub fn install(&mut self, store: &mut EntityStore) -> Result<ServerInstance, InstallationError> {
        let (definition_id, draft) = match &self.phase {
            InstallationPhase::Configuring {
                definition_id,
                draft,
            } => (definition_id.clone(), draft.clone()),
            _ => return Err(self.invalid("install")),
        };

        let created = ServerInstance::new(
            InstanceId::generate(),
            draft.name,
            definition_id.clone(),
            draft.connection,
        )
        .map_err(CatalogStoreError::from)
        .map(|instance| {
            instance
                .with_arguments(draft.arguments.unwrap_or_default())
                .with_env(draft.env)
        })
        .and_then(|instance| {
            store.insert_instance(instance.clone())?;
            Ok(instance)
        });

        match created {
            Ok(instance) => {
                tracing::info!(
                    definition_id = %definition_id,
                    instance_id = %instance.id(),
                    "definition installed"
                );
                self.phase = InstallationPhase::Installed {
                    instance_id: instance.id().clone(),
                    profile_id: draft.target_profile,
                };
                Ok(instance)
            }
            Err(err) => {
                self.fail(definition_id, err.to_string());
                Err(err.into())
            }
        }
    }

    /// Moves the flow to `failed`.
    pub fn fail(&mut self, definition_id: DefinitionId, reason: impl Into<String>) {
        let failure = reason.into();
        tracing::warn!(definition_id = %definition_id, reason = %failure, "installation failed");
        self.phase = InstallationPhase::Failed {
            definition_id,
            reason: failure,
        };
    }

    /// Drops the target profile from an `installed` phase after the
    /// instance could not join it.
    pub(crate) fn detach_profile(&mut self) {
        if let InstallationPhase::Installed { instance_id, profile_id } = &mut self.phase
            && let Some(detached) = profile_id.take()
        {
            tracing::warn!(
                instance_id = %instance_id,
                profile_id = %detached,
                "installed instance not added to profile"
            );
        }
    }

    /// Returns the flow to `idle`.
    pub fn reset(&mut self) {
        self.phase = InstallationPhase::Idle;
    }

    fn invalid(&self, action: &'static str) -> InstallationError {
        InstallationError::InvalidPhase {
            phase: self.phase.name(),
            action,
        }
    }
}
