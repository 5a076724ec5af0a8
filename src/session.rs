//! Session-scoped façade over the catalog and binding services.
//!
//! A [`Dashboard`] is created when the application starts and consumed when
//! the session ends. It owns every cache, so callers pass it explicitly
//! rather than reaching for shared global state.

use crate::binding::{
    domain::{BindingError, DriftRecord, DriftState, MaterializedConfig},
    services::{BindingManager, ConfigMaterializer, ProfileResolver},
};
use crate::catalog::{
    domain::{
        CatalogIntegrityError, CatalogSnapshot, DefinitionId, Host, HostId, HostStatus,
        HostSummary, InstanceId, Profile, ProfileId, ServerDefinition, ServerInstance,
    },
    ports::{CatalogSource, CatalogSourceError, InstanceRuntime},
    services::{
        CatalogStoreError, EntityStore, InstanceLifecycleService, InstanceLifecycleServiceError,
    },
};
use crate::config::{ConfigError, DashboardConfig};
use crate::installation::{InstallationError, InstallationFlow, InstallationPhase};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while opening a session.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Source(#[from] CatalogSourceError),

    /// The loaded catalog is inconsistent.
    #[error(transparent)]
    Integrity(#[from] CatalogIntegrityError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by [`Dashboard::install`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstallError {
    /// The installation flow rejected the request.
    #[error(transparent)]
    Installation(#[from] InstallationError),

    /// The instance was created but could not join the requested profile.
    #[error("instance {instance_id} installed but not added to profile: {source}")]
    Binding {
        /// Instance that was created.
        instance_id: InstanceId,
        /// Why the profile update failed.
        source: BindingError,
    },
}

/// One user session over the catalog.
#[derive(Debug)]
pub struct Dashboard<C>
where
    C: Clock + Send + Sync,
{
    config: DashboardConfig,
    store: EntityStore,
    bindings: BindingManager<C>,
    materializer: ConfigMaterializer,
}

impl<C> Dashboard<C>
where
    C: Clock + Send + Sync,
{
    /// Loads the catalog from `source` and builds every cache.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when the configuration is invalid, the
    /// source fails, or the catalog breaks an entity relationship.
    pub async fn open<S>(
        source: &S,
        config: DashboardConfig,
        clock: Arc<C>,
    ) -> Result<Self, DashboardError>
    where
        S: CatalogSource + ?Sized,
    {
        config.validate()?;
        let snapshot = source.load().await?;
        Self::from_snapshot(snapshot, config, clock)
    }

    /// Builds a session from an already loaded snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when the configuration is invalid or the
    /// snapshot breaks an entity relationship.
    pub fn from_snapshot(
        snapshot: CatalogSnapshot,
        config: DashboardConfig,
        clock: Arc<C>,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        let (store, profiles) = EntityStore::from_snapshot(snapshot)?;
        let resolver = ProfileResolver::new(profiles);
        let bindings = BindingManager::new(&store, resolver, clock);
        let materializer = ConfigMaterializer::new(&config);

        tracing::info!(
            definitions = store.list_definitions().len(),
            instances = store.list_instances().len(),
            profiles = bindings.resolver().len(),
            hosts = store.list_hosts().len(),
            "dashboard session opened"
        );
        Ok(Self {
            config,
            store,
            bindings,
            materializer,
        })
    }

    /// Ends the session and returns the final catalog.
    #[must_use]
    pub fn close(self) -> CatalogSnapshot {
        let snapshot = self.store.snapshot(self.bindings.resolver().to_vec());
        tracing::info!("dashboard session closed");
        snapshot
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Returns the entity store.
    #[must_use]
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Returns the binding manager.
    #[must_use]
    pub const fn bindings(&self) -> &BindingManager<C> {
        &self.bindings
    }

    /// Looks up a definition.
    #[must_use]
    pub fn get_definition(&self, definition_id: &DefinitionId) -> Option<&ServerDefinition> {
        self.store.get_definition(definition_id)
    }

    /// Looks up an instance.
    #[must_use]
    pub fn get_instance(&self, instance_id: &InstanceId) -> Option<&ServerInstance> {
        self.store.get_instance(instance_id)
    }

    /// Lazily yields the instances of one definition in store order.
    pub fn list_instances_by_definition<'a>(
        &'a self,
        definition_id: &'a DefinitionId,
    ) -> impl Iterator<Item = &'a ServerInstance> + 'a {
        self.store.list_instances_by_definition(definition_id)
    }

    /// Looks up a host.
    #[must_use]
    pub fn get_host(&self, host_id: &HostId) -> Option<&Host> {
        self.store.get_host(host_id)
    }

    /// Looks up a profile.
    #[must_use]
    pub fn resolve_profile(&self, profile_id: &ProfileId) -> Option<&Profile> {
        self.bindings.resolver().resolve(profile_id)
    }

    /// Lists every profile in load order.
    #[must_use]
    pub fn list_profiles(&self) -> Vec<&Profile> {
        self.bindings.resolver().list_all().collect()
    }

    /// Lists every host with its reachability.
    #[must_use]
    pub fn list_available_hosts(&self) -> Vec<HostSummary> {
        self.bindings.list_available_hosts(&self.store)
    }

    /// Points a host at a profile, or unbinds it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownHost`] when the host does not exist.
    pub fn rebind(
        &mut self,
        host_id: &HostId,
        profile_id: Option<ProfileId>,
    ) -> Result<Option<&Profile>, BindingError> {
        self.bindings.rebind(&mut self.store, host_id, profile_id)
    }

    /// Returns the profile identifier a host points at.
    #[must_use]
    pub fn bound_profile_id(&self, host_id: &HostId) -> Option<&ProfileId> {
        self.bindings.bound_profile_id(host_id)
    }

    /// Adds an instance to a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError`] when the profile or instance does not exist.
    pub fn add_instance_to_profile(
        &mut self,
        profile_id: &ProfileId,
        instance_id: &InstanceId,
    ) -> Result<&Profile, BindingError> {
        self.bindings
            .add_instance_to_profile(&self.store, profile_id, instance_id)
    }

    /// Removes an instance from a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownProfile`] when the profile does not
    /// exist.
    pub fn remove_instance_from_profile(
        &mut self,
        profile_id: &ProfileId,
        instance_id: &InstanceId,
    ) -> Result<&Profile, BindingError> {
        self.bindings
            .remove_instance_from_profile(profile_id, instance_id)
    }

    /// Adds a new profile.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::DuplicateProfile`] when the identifier is
    /// taken.
    pub fn create_profile(&mut self, profile: Profile) -> Result<&Profile, BindingError> {
        self.bindings.create_profile(profile)
    }

    /// Deletes a profile.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownProfile`] when the profile does not
    /// exist.
    pub fn remove_profile(&mut self, profile_id: &ProfileId) -> Result<Profile, BindingError> {
        self.bindings.remove_profile(profile_id)
    }

    /// Replaces the whole profile collection.
    pub fn replace_profiles(&mut self, profiles: impl IntoIterator<Item = Profile>) {
        self.bindings.replace_profiles(profiles);
    }

    /// Creates a stopped instance of a definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogStoreError`] when validation fails or the definition
    /// is unknown.
    pub fn instantiate(
        &mut self,
        definition_id: &DefinitionId,
        name: impl Into<String>,
        connection: impl Into<String>,
    ) -> Result<ServerInstance, CatalogStoreError> {
        self.store.instantiate(definition_id, name, connection)
    }

    /// Removes an instance.
    ///
    /// Profiles keep the dangling identifier and hosts bound to them become
    /// `dirty`.
    pub fn remove_instance(&mut self, instance_id: &InstanceId) -> Option<ServerInstance> {
        let removed = self.store.remove_instance(instance_id)?;
        self.bindings.instance_removed(instance_id);
        Some(removed)
    }

    /// Starts an instance through `lifecycle`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceLifecycleServiceError`] when the instance is unknown,
    /// the transition is not allowed, or the runtime fails to launch it.
    pub async fn start_instance<R, K>(
        &mut self,
        lifecycle: &InstanceLifecycleService<R, K>,
        instance_id: &InstanceId,
    ) -> Result<ServerInstance, InstanceLifecycleServiceError>
    where
        R: InstanceRuntime,
        K: Clock + Send + Sync,
    {
        lifecycle.start(&mut self.store, instance_id).await
    }

    /// Stops an instance through `lifecycle`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceLifecycleServiceError`] when the instance is unknown,
    /// the transition is not allowed, or the runtime fails to disconnect it.
    pub async fn stop_instance<R, K>(
        &mut self,
        lifecycle: &InstanceLifecycleService<R, K>,
        instance_id: &InstanceId,
    ) -> Result<ServerInstance, InstanceLifecycleServiceError>
    where
        R: InstanceRuntime,
        K: Clock + Send + Sync,
    {
        lifecycle.stop(&mut self.store, instance_id).await
    }

    /// Probes an instance through `lifecycle` and records the result.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceLifecycleServiceError`] when the instance is unknown
    /// or probing fails.
    pub async fn refresh_instance<R, K>(
        &mut self,
        lifecycle: &InstanceLifecycleService<R, K>,
        instance_id: &InstanceId,
    ) -> Result<ServerInstance, InstanceLifecycleServiceError>
    where
        R: InstanceRuntime,
        K: Clock + Send + Sync,
    {
        lifecycle.refresh(&mut self.store, instance_id).await
    }

    /// Records a host's reachability reported by the host integration.
    pub fn set_host_status(&mut self, host_id: &HostId, status: HostStatus) -> bool {
        self.store.set_host_status(host_id, status)
    }

    /// Completes a configured installation.
    ///
    /// The instance is stored first; when the draft names a target profile
    /// it is then added to it.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Installation`] when the flow is not ready or
    /// the instance is rejected, and [`InstallError::Binding`] when the
    /// instance exists but the profile update failed. In that case the flow
    /// stays `installed` without a profile.
    pub fn install(&mut self, flow: &mut InstallationFlow) -> Result<ServerInstance, InstallError> {
        let instance = flow.install(&mut self.store)?;

        let target = match flow.phase() {
            InstallationPhase::Installed { profile_id, .. } => profile_id.clone(),
            _ => None,
        };
        if let Some(profile_id) = target
            && let Err(source) =
                self.bindings
                    .add_instance_to_profile(&self.store, &profile_id, instance.id())
        {
            flow.detach_profile();
            return Err(InstallError::Binding {
                instance_id: instance.id().clone(),
                source,
            });
        }

        Ok(instance)
    }

    /// Produces the configuration a host should be running.
    #[must_use]
    pub fn materialize(&self, host_id: &HostId) -> Option<MaterializedConfig> {
        self.materializer
            .materialize(&self.store, &self.bindings, host_id)
    }

    /// Returns a host's drift state.
    #[must_use]
    pub fn drift_state(&self, host_id: &HostId) -> Option<DriftState> {
        self.bindings.drift_state(host_id)
    }

    /// Returns a host's drift record.
    #[must_use]
    pub fn drift_record(&self, host_id: &HostId) -> Option<&DriftRecord> {
        self.bindings.drift_record(host_id)
    }

    /// Returns whether a host must reload its configuration.
    #[must_use]
    pub fn needs_refresh(&self, host_id: &HostId) -> bool {
        self.bindings.needs_refresh(host_id)
    }

    /// Lists hosts that must reload their configuration.
    #[must_use]
    pub fn hosts_needing_refresh(&self) -> Vec<HostId> {
        self.bindings
            .notifier()
            .needs_refresh()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Acknowledges that a host reloaded the current configuration.
    ///
    /// The fingerprint of the configuration materialized now is recorded as
    /// the one applied, and the materialization is returned.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownHost`] when the host does not exist.
    pub fn acknowledge_refresh(
        &mut self,
        host_id: &HostId,
    ) -> Result<MaterializedConfig, BindingError> {
        let materialized = self
            .materialize(host_id)
            .ok_or_else(|| BindingError::UnknownHost(host_id.clone()))?;
        self.bindings
            .acknowledge_refresh(host_id, Some(materialized.fingerprint()))?;
        tracing::debug!(host_id = %host_id, "host refresh acknowledged");
        Ok(materialized)
    }
}
