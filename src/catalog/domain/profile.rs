//! Profiles: named, reusable bundles of server instances.

use super::{CatalogDomainError, InstanceId, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named set of server instances that can be bound to hosts.
///
/// Membership has set semantics. Instances are kept in the order they were
/// added so listings stay stable, but equality of membership ignores order
/// (see [`Profile::has_same_instances`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: ProfileId,
    name: String,
    #[serde(default, deserialize_with = "deserialize_instance_set")]
    instance_ids: Vec<InstanceId>,
}

fn deserialize_instance_set<'de, D>(deserializer: D) -> Result<Vec<InstanceId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<InstanceId>::deserialize(deserializer)?;
    Ok(dedup_preserving_order(raw))
}

fn dedup_preserving_order(values: impl IntoIterator<Item = InstanceId>) -> Vec<InstanceId> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

impl Profile {
    /// Creates an empty profile.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyDisplayName`] when `name` is empty
    /// after trimming.
    pub fn new(id: ProfileId, name: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(CatalogDomainError::EmptyDisplayName);
        }

        Ok(Self {
            id,
            name: normalized_name,
            instance_ids: Vec::new(),
        })
    }

    /// Replaces the member instances, dropping duplicates.
    #[must_use]
    pub fn with_instances(mut self, instance_ids: impl IntoIterator<Item = InstanceId>) -> Self {
        self.instance_ids = dedup_preserving_order(instance_ids);
        self
    }

    /// Returns the profile identifier.
    #[must_use]
    pub const fn id(&self) -> &ProfileId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns member instance identifiers in insertion order.
    #[must_use]
    pub fn instance_ids(&self) -> &[InstanceId] {
        &self.instance_ids
    }

    /// Returns whether the instance is a member.
    #[must_use]
    pub fn contains(&self, instance_id: &InstanceId) -> bool {
        self.instance_ids.contains(instance_id)
    }

    /// Returns whether both profiles aggregate the same instances,
    /// regardless of order.
    #[must_use]
    pub fn has_same_instances(&self, other: &Self) -> bool {
        let own: HashSet<&InstanceId> = self.instance_ids.iter().collect();
        let theirs: HashSet<&InstanceId> = other.instance_ids.iter().collect();
        own == theirs
    }

    /// Adds an instance. Returns `false` when it was already a member.
    pub fn insert(&mut self, instance_id: InstanceId) -> bool {
        if self.contains(&instance_id) {
            return false;
        }
        self.instance_ids.push(instance_id);
        true
    }

    /// Removes an instance. Returns `false` when it was not a member.
    pub fn remove(&mut self, instance_id: &InstanceId) -> bool {
        let before = self.instance_ids.len();
        self.instance_ids.retain(|id| id != instance_id);
        self.instance_ids.len() != before
    }
}
