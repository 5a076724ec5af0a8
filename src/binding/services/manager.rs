//! Host-to-profile binding ownership and mutation.

use super::{DriftNotifier, ProfileResolver};
use crate::binding::domain::{BindingError, DriftReason, DriftRecord, DriftState};
use crate::catalog::{
    domain::{HostId, HostSummary, InstanceId, Profile, ProfileId},
    services::EntityStore,
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns which profile each host points at, and the profiles themselves.
///
/// Every mutation that can change what a host should be running reports to
/// the [`DriftNotifier`] before returning, so reads issued afterwards always
/// observe both the new binding and the new drift state.
#[derive(Debug, Clone)]
pub struct BindingManager<C>
where
    C: Clock + Send + Sync,
{
    bindings: HashMap<HostId, Option<ProfileId>>,
    resolver: ProfileResolver,
    notifier: DriftNotifier<C>,
}

impl<C> BindingManager<C>
where
    C: Clock + Send + Sync,
{
    /// Seeds bindings from every host's persisted profile identifier.
    ///
    /// All hosts start `clean`. Hosts whose persisted profile does not
    /// resolve are logged and treated as unbound when read.
    #[must_use]
    pub fn new(store: &EntityStore, resolver: ProfileResolver, clock: Arc<C>) -> Self {
        let mut notifier = DriftNotifier::new(clock);
        let mut bindings = HashMap::with_capacity(store.list_hosts().len());

        for host in store.list_hosts() {
            if let Some(profile_id) = host.profile_id()
                && resolver.resolve(profile_id).is_none()
            {
                tracing::warn!(
                    host_id = %host.id(),
                    profile_id = %profile_id,
                    "host bound to unknown profile"
                );
            }
            bindings.insert(host.id().clone(), host.profile_id().cloned());
            notifier.track(host.id().clone());
        }

        Self {
            bindings,
            resolver,
            notifier,
        }
    }

    /// Returns the profile resolver.
    #[must_use]
    pub const fn resolver(&self) -> &ProfileResolver {
        &self.resolver
    }

    /// Returns the drift notifier.
    #[must_use]
    pub const fn notifier(&self) -> &DriftNotifier<C> {
        &self.notifier
    }

    /// Points a host at a profile, or unbinds it with `None`.
    ///
    /// The host's record in `store` is updated together with the binding
    /// cache, and the host becomes `dirty`. Binding to an identifier that
    /// does not resolve still succeeds; the host is then effectively unbound
    /// and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownHost`] when the host does not exist.
    pub fn rebind(
        &mut self,
        store: &mut EntityStore,
        host_id: &HostId,
        profile_id: Option<ProfileId>,
    ) -> Result<Option<&Profile>, BindingError> {
        let Some(binding) = self.bindings.get_mut(host_id) else {
            return Err(BindingError::UnknownHost(host_id.clone()));
        };
        if !store.assign_host_profile(host_id, profile_id.clone()) {
            return Err(BindingError::UnknownHost(host_id.clone()));
        }

        let resolves = profile_id
            .as_ref()
            .is_none_or(|id| self.resolver.resolve(id).is_some());
        let reason = if resolves {
            DriftReason::Rebound
        } else {
            DriftReason::UnresolvedProfile
        };

        tracing::info!(
            host_id = %host_id,
            profile_id = profile_id.as_ref().map_or("", ProfileId::as_str),
            resolves,
            "host rebound"
        );
        binding.clone_from(&profile_id);
        self.notifier.mark_dirty(host_id, reason);

        Ok(profile_id.as_ref().and_then(|id| self.resolver.resolve(id)))
    }

    /// Returns the profile identifier a host points at, if any.
    ///
    /// The identifier is returned even when it no longer resolves.
    #[must_use]
    pub fn bound_profile_id(&self, host_id: &HostId) -> Option<&ProfileId> {
        self.bindings.get(host_id).and_then(Option::as_ref)
    }

    /// Returns the resolved profile a host points at, if it resolves.
    #[must_use]
    pub fn bound_profile(&self, host_id: &HostId) -> Option<&Profile> {
        self.bound_profile_id(host_id)
            .and_then(|profile_id| self.resolver.resolve(profile_id))
    }

    /// Returns every host bound to `profile_id`, sorted by identifier.
    #[must_use]
    pub fn hosts_bound_to(&self, profile_id: &ProfileId) -> Vec<HostId> {
        let mut hosts: Vec<HostId> = self
            .bindings
            .iter()
            .filter(|(_, bound)| bound.as_ref() == Some(profile_id))
            .map(|(host_id, _)| host_id.clone())
            .collect();
        hosts.sort();
        hosts
    }

    /// Adds an instance to a profile.
    ///
    /// Adding an existing member is a no-op and does not dirty any host.
    /// Otherwise every host bound to the profile becomes `dirty`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownInstance`] or
    /// [`BindingError::UnknownProfile`] without changing any state.
    pub fn add_instance_to_profile(
        &mut self,
        store: &EntityStore,
        profile_id: &ProfileId,
        instance_id: &InstanceId,
    ) -> Result<&Profile, BindingError> {
        if store.get_instance(instance_id).is_none() {
            return Err(BindingError::UnknownInstance(instance_id.clone()));
        }

        let changed = self
            .resolver
            .insert_instance(profile_id, instance_id.clone())
            .ok_or_else(|| BindingError::UnknownProfile(profile_id.clone()))?;
        if changed {
            tracing::debug!(
                profile_id = %profile_id,
                instance_id = %instance_id,
                "instance added to profile"
            );
            self.mark_bound_hosts(profile_id, DriftReason::ProfileChanged);
        }

        self.resolver
            .resolve(profile_id)
            .ok_or_else(|| BindingError::UnknownProfile(profile_id.clone()))
    }

    /// Removes an instance from a profile.
    ///
    /// Dangling members can be removed even though the instance no longer
    /// exists. Removing a non-member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownProfile`] without changing any state.
    pub fn remove_instance_from_profile(
        &mut self,
        profile_id: &ProfileId,
        instance_id: &InstanceId,
    ) -> Result<&Profile, BindingError> {
        let changed = self
            .resolver
            .remove_instance(profile_id, instance_id)
            .ok_or_else(|| BindingError::UnknownProfile(profile_id.clone()))?;
        if changed {
            tracing::debug!(
                profile_id = %profile_id,
                instance_id = %instance_id,
                "instance removed from profile"
            );
            self.mark_bound_hosts(profile_id, DriftReason::ProfileChanged);
        }

        self.resolver
            .resolve(profile_id)
            .ok_or_else(|| BindingError::UnknownProfile(profile_id.clone()))
    }

    /// Adds a new profile.
    ///
    /// Hosts still holding this identifier from an earlier deletion resolve
    /// it again and become `dirty`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::DuplicateProfile`] when the identifier is
    /// taken.
    pub fn create_profile(&mut self, profile: Profile) -> Result<&Profile, BindingError> {
        let profile_id = profile.id().clone();
        if !self.resolver.register(profile) {
            return Err(BindingError::DuplicateProfile(profile_id));
        }
        tracing::info!(profile_id = %profile_id, "profile created");
        self.mark_bound_hosts(&profile_id, DriftReason::ProfileChanged);

        self.resolver
            .resolve(&profile_id)
            .ok_or(BindingError::UnknownProfile(profile_id))
    }

    /// Deletes a profile.
    ///
    /// Hosts bound to it keep the stale identifier, become `dirty`, and are
    /// treated as unbound from then on.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownProfile`] when the profile does not
    /// exist.
    pub fn remove_profile(&mut self, profile_id: &ProfileId) -> Result<Profile, BindingError> {
        let removed = self
            .resolver
            .remove(profile_id)
            .ok_or_else(|| BindingError::UnknownProfile(profile_id.clone()))?;
        tracing::info!(profile_id = %profile_id, "profile removed");
        self.mark_bound_hosts(profile_id, DriftReason::ProfileRemoved);
        Ok(removed)
    }

    /// Marks hosts dirty whose bound profile lists a removed instance.
    ///
    /// Profiles keep the dangling identifier; the instance is skipped when
    /// materializing, so the bound hosts' configuration changes.
    pub fn instance_removed(&mut self, instance_id: &InstanceId) {
        let affected: Vec<ProfileId> = self
            .resolver
            .list_all()
            .filter(|profile| profile.contains(instance_id))
            .map(|profile| profile.id().clone())
            .collect();
        for profile_id in affected {
            self.mark_bound_hosts(&profile_id, DriftReason::ProfileChanged);
        }
    }

    /// Replaces the whole profile collection.
    ///
    /// The resolver cache is swapped atomically. Bound hosts whose profile
    /// disappeared or whose instance set differs become `dirty`.
    pub fn replace_profiles(&mut self, profiles: impl IntoIterator<Item = Profile>) {
        let previous = self.resolver.clone();
        self.resolver.initialize(profiles);

        let mut changes: Vec<(HostId, DriftReason)> = Vec::new();
        for (host_id, bound) in &self.bindings {
            let Some(profile_id) = bound else {
                continue;
            };
            match (previous.resolve(profile_id), self.resolver.resolve(profile_id)) {
                (Some(_), None) => changes.push((host_id.clone(), DriftReason::ProfileRemoved)),
                (None, Some(_)) => changes.push((host_id.clone(), DriftReason::ProfileChanged)),
                (Some(old), Some(new)) if !old.has_same_instances(new) => {
                    changes.push((host_id.clone(), DriftReason::ProfileChanged));
                }
                _ => {}
            }
        }

        for (host_id, reason) in changes {
            self.notifier.mark_dirty(&host_id, reason);
        }
    }

    /// Returns the drift state of a host.
    #[must_use]
    pub fn drift_state(&self, host_id: &HostId) -> Option<DriftState> {
        self.notifier.state(host_id)
    }

    /// Returns the drift record of a host.
    #[must_use]
    pub fn drift_record(&self, host_id: &HostId) -> Option<&DriftRecord> {
        self.notifier.record(host_id)
    }

    /// Returns whether a host needs to reload its configuration.
    #[must_use]
    pub fn needs_refresh(&self, host_id: &HostId) -> bool {
        self.notifier.is_dirty(host_id)
    }

    /// Acknowledges that a host reloaded its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownHost`] when the host is not tracked.
    pub fn acknowledge_refresh(
        &mut self,
        host_id: &HostId,
        applied_fingerprint: Option<String>,
    ) -> Result<(), BindingError> {
        if self.notifier.acknowledge(host_id, applied_fingerprint) {
            Ok(())
        } else {
            Err(BindingError::UnknownHost(host_id.clone()))
        }
    }

    /// Lists every host with its reachability for selection menus.
    #[must_use]
    pub fn list_available_hosts(&self, store: &EntityStore) -> Vec<HostSummary> {
        store.host_summaries()
    }

    fn mark_bound_hosts(&mut self, profile_id: &ProfileId, reason: DriftReason) {
        for host_id in self.hosts_bound_to(profile_id) {
            self.notifier.mark_dirty(&host_id, reason);
        }
    }
}
