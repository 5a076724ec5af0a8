//! Centralized per-host drift tracking.

use crate::binding::domain::{DriftReason, DriftRecord, DriftState};
use crate::catalog::domain::HostId;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Tracks, per host, whether the applied configuration is stale.
///
/// Each host is an independent state machine: `clean` until a change is
/// reported, then `dirty` until [`DriftNotifier::acknowledge`] is called for
/// that host.
#[derive(Debug, Clone)]
pub struct DriftNotifier<C>
where
    C: Clock + Send + Sync,
{
    records: HashMap<HostId, DriftRecord>,
    clock: Arc<C>,
}

impl<C> DriftNotifier<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a notifier tracking no hosts.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            records: HashMap::new(),
            clock,
        }
    }

    /// Starts tracking a host in the `clean` state. Existing records are
    /// kept.
    pub fn track(&mut self, host_id: HostId) {
        self.records.entry(host_id).or_default();
    }

    /// Marks a tracked host dirty. Returns `false` for untracked hosts.
    pub fn mark_dirty(&mut self, host_id: &HostId, reason: DriftReason) -> bool {
        let Some(record) = self.records.get_mut(host_id) else {
            return false;
        };
        record.mark_dirty(reason, self.clock.utc());
        tracing::debug!(host_id = %host_id, reason = %reason, "host marked dirty");
        true
    }

    /// Marks a tracked host clean after it reloaded its configuration.
    ///
    /// Only the named host is affected. Returns `false` for untracked hosts.
    pub fn acknowledge(&mut self, host_id: &HostId, applied_fingerprint: Option<String>) -> bool {
        let Some(record) = self.records.get_mut(host_id) else {
            return false;
        };
        record.acknowledge(applied_fingerprint, self.clock.utc());
        tracing::debug!(host_id = %host_id, "host acknowledged refresh");
        true
    }

    /// Returns the drift state of a tracked host.
    #[must_use]
    pub fn state(&self, host_id: &HostId) -> Option<DriftState> {
        self.records.get(host_id).map(DriftRecord::state)
    }

    /// Returns the full drift record of a tracked host.
    #[must_use]
    pub fn record(&self, host_id: &HostId) -> Option<&DriftRecord> {
        self.records.get(host_id)
    }

    /// Returns whether a host should show a "needs refresh" hint.
    #[must_use]
    pub fn is_dirty(&self, host_id: &HostId) -> bool {
        self.state(host_id) == Some(DriftState::Dirty)
    }

    /// Returns every dirty host, sorted by identifier.
    #[must_use]
    pub fn needs_refresh(&self) -> Vec<&HostId> {
        let mut dirty: Vec<&HostId> = self
            .records
            .iter()
            .filter(|(_, record)| record.state() == DriftState::Dirty)
            .map(|(host_id, _)| host_id)
            .collect();
        dirty.sort();
        dirty
    }
}
