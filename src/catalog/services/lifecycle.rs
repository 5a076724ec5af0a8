//! Service layer driving instance status through an [`InstanceRuntime`].

use super::{CatalogStoreError, EntityStore, StatusChange};
use crate::catalog::{
    domain::{
        CatalogDomainError, CatalogIntegrityError, InstanceId, InstanceStatus, ServerDefinition,
        ServerInstance,
    },
    ports::{InstanceProbe, InstanceRuntime, InstanceRuntimeError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for instance lifecycle operations.
#[derive(Debug, Error)]
pub enum InstanceLifecycleServiceError {
    /// Store lookup or transition failed.
    #[error(transparent)]
    Store(#[from] CatalogStoreError),
    /// Runtime operation failed.
    #[error(transparent)]
    Runtime(#[from] InstanceRuntimeError),
}

/// Result type for lifecycle service operations.
pub type InstanceLifecycleServiceResult<T> = Result<T, InstanceLifecycleServiceError>;

/// Instance lifecycle orchestration service.
#[derive(Clone)]
pub struct InstanceLifecycleService<R, C>
where
    R: InstanceRuntime,
    C: Clock + Send + Sync,
{
    runtime: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> InstanceLifecycleService<R, C>
where
    R: InstanceRuntime,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(runtime: Arc<R>, clock: Arc<C>) -> Self {
        Self { runtime, clock }
    }

    fn find_with_definition(
        store: &EntityStore,
        instance_id: &InstanceId,
    ) -> InstanceLifecycleServiceResult<(ServerInstance, ServerDefinition)> {
        let instance = store
            .get_instance(instance_id)
            .cloned()
            .ok_or_else(|| CatalogStoreError::InstanceNotFound(instance_id.clone()))?;
        let definition = store
            .get_definition(instance.definition_id())
            .cloned()
            .ok_or_else(|| {
                CatalogStoreError::from(CatalogIntegrityError::UnknownDefinition {
                    instance_id: instance_id.clone(),
                    definition_id: instance.definition_id().clone(),
                })
            })?;
        Ok((instance, definition))
    }

    /// Starts an instance: `connecting`, then `running` or `error`.
    ///
    /// # Errors
    ///
    /// Returns store errors for unknown instances or disallowed transitions,
    /// and runtime errors when launching fails (the instance is left in
    /// `error`).
    pub async fn start(
        &self,
        store: &mut EntityStore,
        instance_id: &InstanceId,
    ) -> InstanceLifecycleServiceResult<ServerInstance> {
        let (instance, definition) = Self::find_with_definition(store, instance_id)?;
        store.update_instance_status(instance_id, StatusChange::Connecting, &*self.clock)?;

        if let Err(err) = self.runtime.connect(&definition, &instance).await {
            tracing::warn!(instance_id = %instance_id, error = %err, "instance failed to start");
            store.update_instance_status(
                instance_id,
                StatusChange::Failed(err.to_string()),
                &*self.clock,
            )?;
            return Err(err.into());
        }

        let started =
            store.update_instance_status(instance_id, StatusChange::Running, &*self.clock)?;
        tracing::info!(instance_id = %instance_id, "instance started");
        Ok(started.clone())
    }

    /// Stops an instance.
    ///
    /// # Errors
    ///
    /// Returns store errors for unknown instances or disallowed transitions,
    /// and runtime errors when disconnecting fails.
    pub async fn stop(
        &self,
        store: &mut EntityStore,
        instance_id: &InstanceId,
    ) -> InstanceLifecycleServiceResult<ServerInstance> {
        let (instance, _) = Self::find_with_definition(store, instance_id)?;
        if !instance.status().can_transition_to(InstanceStatus::Stopped) {
            return Err(CatalogStoreError::from(CatalogDomainError::InvalidStatusTransition {
                instance_id: instance_id.clone(),
                from: instance.status().as_str().to_owned(),
                to: InstanceStatus::Stopped.as_str().to_owned(),
            })
            .into());
        }

        self.runtime.disconnect(&instance).await?;
        let stopped =
            store.update_instance_status(instance_id, StatusChange::Stopped, &*self.clock)?;
        tracing::info!(instance_id = %instance_id, "instance stopped");
        Ok(stopped.clone())
    }

    /// Probes a running instance and folds the observation into the store.
    ///
    /// Healthy probes add to the request counter; failures and unreachable
    /// instances move a running instance into `error`.
    ///
    /// # Errors
    ///
    /// Returns store errors for unknown instances and runtime errors when
    /// probing fails.
    pub async fn refresh(
        &self,
        store: &mut EntityStore,
        instance_id: &InstanceId,
    ) -> InstanceLifecycleServiceResult<ServerInstance> {
        let (instance, _) = Self::find_with_definition(store, instance_id)?;
        let probe = self.runtime.probe(&instance).await?;
        let is_running = instance.status() == InstanceStatus::Running;

        match probe {
            InstanceProbe::Healthy { requests } => store.record_requests(instance_id, requests)?,
            InstanceProbe::Unreachable if is_running => {
                store.update_instance_status(
                    instance_id,
                    StatusChange::Failed("instance unreachable".to_owned()),
                    &*self.clock,
                )?;
            }
            InstanceProbe::Failed { message } if is_running => {
                store.update_instance_status(
                    instance_id,
                    StatusChange::Failed(message),
                    &*self.clock,
                )?;
            }
            InstanceProbe::Unreachable | InstanceProbe::Failed { .. } => {}
        }

        store
            .get_instance(instance_id)
            .cloned()
            .ok_or_else(|| CatalogStoreError::InstanceNotFound(instance_id.clone()).into())
    }
}
