//! Identifier-to-profile lookup cache.

use crate::catalog::domain::{InstanceId, Profile, ProfileId};
use std::collections::HashMap;

/// Resolves profile identifiers to profiles in constant time.
///
/// The resolver owns the profile collection for the lifetime of a session.
/// Unknown identifiers resolve to `None`; a profile that is missing is an
/// expected condition, not a failure.
#[derive(Debug, Clone, Default)]
pub struct ProfileResolver {
    profiles: HashMap<ProfileId, Profile>,
    order: Vec<ProfileId>,
}

impl ProfileResolver {
    /// Creates a resolver over `profiles`.
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let mut resolver = Self::default();
        resolver.initialize(profiles);
        resolver
    }

    /// Rebuilds the cache from `profiles`.
    ///
    /// The new cache is assembled off to the side and swapped in whole, so
    /// readers see either the old or the new collection. When an identifier
    /// repeats, the first profile wins.
    pub fn initialize(&mut self, profiles: impl IntoIterator<Item = Profile>) {
        let mut rebuilt = Self::default();
        for profile in profiles {
            let profile_id = profile.id().clone();
            if !rebuilt.register(profile) {
                tracing::warn!(profile_id = %profile_id, "duplicate profile ignored");
            }
        }
        *self = rebuilt;
        tracing::debug!(profiles = self.order.len(), "profile cache rebuilt");
    }

    /// Returns the profile with the given identifier.
    #[must_use]
    pub fn resolve(&self, profile_id: &ProfileId) -> Option<&Profile> {
        self.profiles.get(profile_id)
    }

    /// Returns all profiles in registration order.
    pub fn list_all(&self) -> impl Iterator<Item = &Profile> {
        self.order.iter().filter_map(|id| self.profiles.get(id))
    }

    /// Returns the number of cached profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether no profiles are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Adds a profile. Returns `false`, leaving the cache untouched, when
    /// the identifier is already registered.
    pub fn register(&mut self, profile: Profile) -> bool {
        if self.profiles.contains_key(profile.id()) {
            return false;
        }
        self.order.push(profile.id().clone());
        self.profiles.insert(profile.id().clone(), profile);
        true
    }

    pub(crate) fn remove(&mut self, profile_id: &ProfileId) -> Option<Profile> {
        let removed = self.profiles.remove(profile_id)?;
        self.order.retain(|id| id != profile_id);
        Some(removed)
    }

    /// Returns `None` for unknown profiles, otherwise whether the set changed.
    pub(crate) fn insert_instance(
        &mut self,
        profile_id: &ProfileId,
        instance_id: InstanceId,
    ) -> Option<bool> {
        self.profiles
            .get_mut(profile_id)
            .map(|profile| profile.insert(instance_id))
    }

    /// Returns `None` for unknown profiles, otherwise whether the set changed.
    pub(crate) fn remove_instance(
        &mut self,
        profile_id: &ProfileId,
        instance_id: &InstanceId,
    ) -> Option<bool> {
        self.profiles
            .get_mut(profile_id)
            .map(|profile| profile.remove(instance_id))
    }

    /// Returns owned copies of all profiles in registration order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Profile> {
        self.list_all().cloned().collect()
    }
}
