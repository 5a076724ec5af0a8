//! Authoritative in-memory collections of definitions, instances, and hosts.

use crate::catalog::domain::{
    CatalogDomainError, CatalogIntegrityError, CatalogSnapshot, DefinitionId, Host, HostId,
    HostStatus, HostSummary, InstanceId, Profile, ProfileId, ServerDefinition, ServerInstance,
};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use thiserror::Error;

/// Errors returned by entity store mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogStoreError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),
    /// The mutation would break an entity relationship.
    #[error(transparent)]
    Integrity(#[from] CatalogIntegrityError),
    /// No instance exists with the given identifier.
    #[error("instance {0} not found")]
    InstanceNotFound(InstanceId),
}

/// Status change requested by instance-management collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// Begin starting the instance.
    Connecting,
    /// The instance is up.
    Running,
    /// The instance was stopped.
    Stopped,
    /// The instance failed with a message.
    Failed(String),
}

/// Ordered collection with an identifier index.
#[derive(Debug, Clone)]
struct Indexed<K, V> {
    items: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K, V> Indexed<K, V>
where
    K: Clone + Eq + Hash,
{
    fn build(items: Vec<V>, key: impl Fn(&V) -> &K) -> Result<Self, K> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(key(item).clone(), position).is_some() {
                return Err(key(item).clone());
            }
        }
        Ok(Self { items, index })
    }

    fn get(&self, id: &K) -> Option<&V> {
        self.index.get(id).and_then(|&position| self.items.get(position))
    }

    fn get_mut(&mut self, id: &K) -> Option<&mut V> {
        self.index
            .get(id)
            .and_then(|&position| self.items.get_mut(position))
    }

    fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    fn push(&mut self, id: K, item: V) {
        self.index.insert(id, self.items.len());
        self.items.push(item);
    }

    fn remove(&mut self, id: &K, key: impl Fn(&V) -> &K) -> Option<V> {
        let position = self.index.remove(id)?;
        if position >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(position);
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (key(item).clone(), index))
            .collect();
        Some(removed)
    }
}

/// Authoritative in-memory store for catalog entities.
///
/// Profiles are handed to the [`crate::binding::services::ProfileResolver`]
/// at load time and are owned by it afterwards.
#[derive(Debug, Clone)]
pub struct EntityStore {
    definitions: Indexed<DefinitionId, ServerDefinition>,
    instances: Indexed<InstanceId, ServerInstance>,
    hosts: Indexed<HostId, Host>,
}

impl EntityStore {
    /// Builds a store from a loaded snapshot, returning the profiles for the
    /// resolver.
    ///
    /// Profiles referencing unknown instances are kept; only a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogIntegrityError`] when identifiers are duplicated or
    /// an instance references an unknown definition.
    pub fn from_snapshot(
        snapshot: CatalogSnapshot,
    ) -> Result<(Self, Vec<Profile>), CatalogIntegrityError> {
        let CatalogSnapshot {
            definitions,
            instances,
            profiles,
            hosts,
        } = snapshot;

        let definitions = Indexed::build(definitions, ServerDefinition::id)
            .map_err(CatalogIntegrityError::DuplicateDefinition)?;
        let instances = Indexed::build(instances, ServerInstance::id)
            .map_err(CatalogIntegrityError::DuplicateInstance)?;
        let hosts =
            Indexed::build(hosts, Host::id).map_err(CatalogIntegrityError::DuplicateHost)?;

        if let Some(orphan) = instances
            .items
            .iter()
            .find(|instance| !definitions.contains(instance.definition_id()))
        {
            return Err(CatalogIntegrityError::UnknownDefinition {
                instance_id: orphan.id().clone(),
                definition_id: orphan.definition_id().clone(),
            });
        }

        let mut profile_ids = HashSet::new();
        for profile in &profiles {
            if !profile_ids.insert(profile.id().clone()) {
                return Err(CatalogIntegrityError::DuplicateProfile(profile.id().clone()));
            }
            for dangling in profile
                .instance_ids()
                .iter()
                .filter(|id| !instances.contains(id))
            {
                tracing::warn!(
                    profile_id = %profile.id(),
                    instance_id = %dangling,
                    "profile references unknown instance"
                );
            }
        }

        tracing::debug!(
            definitions = definitions.items.len(),
            instances = instances.items.len(),
            profiles = profiles.len(),
            hosts = hosts.items.len(),
            "entity store built"
        );

        Ok((
            Self {
                definitions,
                instances,
                hosts,
            },
            profiles,
        ))
    }

    /// Returns a definition by identifier.
    #[must_use]
    pub fn get_definition(&self, definition_id: &DefinitionId) -> Option<&ServerDefinition> {
        self.definitions.get(definition_id)
    }

    /// Returns all definitions in store order.
    #[must_use]
    pub fn list_definitions(&self) -> &[ServerDefinition] {
        &self.definitions.items
    }

    /// Returns an instance by identifier.
    #[must_use]
    pub fn get_instance(&self, instance_id: &InstanceId) -> Option<&ServerInstance> {
        self.instances.get(instance_id)
    }

    /// Returns all instances in store order.
    #[must_use]
    pub fn list_instances(&self) -> &[ServerInstance] {
        &self.instances.items
    }

    /// Lazily yields the instances of one definition in store order.
    pub fn list_instances_by_definition<'a>(
        &'a self,
        definition_id: &'a DefinitionId,
    ) -> impl Iterator<Item = &'a ServerInstance> + 'a {
        self.instances
            .items
            .iter()
            .filter(move |instance| instance.definition_id() == definition_id)
    }

    /// Returns a host by identifier.
    #[must_use]
    pub fn get_host(&self, host_id: &HostId) -> Option<&Host> {
        self.hosts.get(host_id)
    }

    /// Returns all hosts in store order.
    #[must_use]
    pub fn list_hosts(&self) -> &[Host] {
        &self.hosts.items
    }

    /// Projects every host into a selection-list summary.
    #[must_use]
    pub fn host_summaries(&self) -> Vec<HostSummary> {
        self.hosts.items.iter().map(Host::summary).collect()
    }

    /// Adds an instance created elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogStoreError::Integrity`] when the identifier is taken
    /// or the definition is unknown.
    pub fn insert_instance(&mut self, instance: ServerInstance) -> Result<(), CatalogStoreError> {
        if self.instances.contains(instance.id()) {
            return Err(CatalogIntegrityError::DuplicateInstance(instance.id().clone()).into());
        }
        if !self.definitions.contains(instance.definition_id()) {
            return Err(CatalogIntegrityError::UnknownDefinition {
                instance_id: instance.id().clone(),
                definition_id: instance.definition_id().clone(),
            }
            .into());
        }

        tracing::debug!(
            instance_id = %instance.id(),
            definition_id = %instance.definition_id(),
            "instance added"
        );
        self.instances.push(instance.id().clone(), instance);
        Ok(())
    }

    /// Creates a stopped instance of a definition under a fresh identifier.
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
        let instance = ServerInstance::new(
            InstanceId::generate(),
            name,
            definition_id.clone(),
            connection,
        )?;
        self.insert_instance(instance.clone())?;
        Ok(instance)
    }

    /// Removes an instance. Profiles referencing it keep a dangling
    /// identifier.
    pub fn remove_instance(&mut self, instance_id: &InstanceId) -> Option<ServerInstance> {
        let removed = self.instances.remove(instance_id, ServerInstance::id);
        if removed.is_some() {
            tracing::debug!(instance_id = %instance_id, "instance removed");
        }
        removed
    }

    /// Applies a status change reported by instance-management collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogStoreError::InstanceNotFound`] for unknown instances
    /// and [`CatalogStoreError::Domain`] for disallowed transitions.
    pub fn update_instance_status(
        &mut self,
        instance_id: &InstanceId,
        change: StatusChange,
        clock: &impl Clock,
    ) -> Result<&ServerInstance, CatalogStoreError> {
        let instance = self
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| CatalogStoreError::InstanceNotFound(instance_id.clone()))?;

        match change {
            StatusChange::Connecting => instance.mark_connecting(clock)?,
            StatusChange::Running => instance.mark_running(clock)?,
            StatusChange::Stopped => instance.mark_stopped(clock)?,
            StatusChange::Failed(message) => instance.mark_error(message, clock)?,
        }

        tracing::debug!(
            instance_id = %instance_id,
            status = %instance.status(),
            "instance status changed"
        );
        Ok(instance)
    }

    /// Adds served requests to an instance's counter.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogStoreError::InstanceNotFound`] for unknown instances.
    pub fn record_requests(
        &mut self,
        instance_id: &InstanceId,
        requests: u64,
    ) -> Result<(), CatalogStoreError> {
        let instance = self
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| CatalogStoreError::InstanceNotFound(instance_id.clone()))?;
        instance.record_requests(requests);
        Ok(())
    }

    /// Records a host's reported reachability. Returns `false` for unknown
    /// hosts.
    pub fn set_host_status(&mut self, host_id: &HostId, status: HostStatus) -> bool {
        self.hosts.get_mut(host_id).is_some_and(|host| {
            host.set_status(status);
            true
        })
    }

    pub(crate) fn assign_host_profile(
        &mut self,
        host_id: &HostId,
        profile_id: Option<ProfileId>,
    ) -> bool {
        self.hosts.get_mut(host_id).is_some_and(|host| {
            host.set_profile(profile_id);
            true
        })
    }

    /// Rebuilds a snapshot from the store and the supplied profiles.
    #[must_use]
    pub fn snapshot(&self, profiles: Vec<Profile>) -> CatalogSnapshot {
        CatalogSnapshot {
            definitions: self.definitions.items.clone(),
            instances: self.instances.items.clone(),
            profiles,
            hosts: self.hosts.items.clone(),
        }
    }
}
