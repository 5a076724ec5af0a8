//! Per-host drift state machine.
//!
//! A host is `dirty` from the moment its binding or its bound profile's
//! contents change until the host is explicitly acknowledged as refreshed.
//! Nothing clears the flag implicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a host's applied configuration is believed to be current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftState {
    /// No change since the last acknowledgment.
    Clean,
    /// The host needs to reload its configuration.
    Dirty,
}

impl DriftState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
        }
    }
}

impl fmt::Display for DriftState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Event that most recently made a host dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftReason {
    /// The host was bound to a different (or the same) profile, or unbound.
    Rebound,
    /// The host was bound to a profile identifier that does not resolve.
    UnresolvedProfile,
    /// The bound profile's instance set changed.
    ProfileChanged,
    /// The bound profile was deleted.
    ProfileRemoved,
}

impl DriftReason {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rebound => "rebound",
            Self::UnresolvedProfile => "unresolved_profile",
            Self::ProfileChanged => "profile_changed",
            Self::ProfileRemoved => "profile_removed",
        }
    }
}

impl fmt::Display for DriftReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Drift bookkeeping for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftRecord {
    state: DriftState,
    reason: Option<DriftReason>,
    changed_at: Option<DateTime<Utc>>,
    acknowledged_at: Option<DateTime<Utc>>,
    applied_fingerprint: Option<String>,
}

impl Default for DriftRecord {
    fn default() -> Self {
        Self::clean()
    }
}

impl DriftRecord {
    /// Creates a record for a host that has never changed.
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            state: DriftState::Clean,
            reason: None,
            changed_at: None,
            acknowledged_at: None,
            applied_fingerprint: None,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> DriftState {
        self.state
    }

    /// Returns the event behind the current `dirty` state.
    #[must_use]
    pub const fn reason(&self) -> Option<DriftReason> {
        self.reason
    }

    /// Returns when the host last became dirty.
    #[must_use]
    pub const fn changed_at(&self) -> Option<DateTime<Utc>> {
        self.changed_at
    }

    /// Returns when the host was last acknowledged.
    #[must_use]
    pub const fn acknowledged_at(&self) -> Option<DateTime<Utc>> {
        self.acknowledged_at
    }

    /// Returns the fingerprint of the configuration the host last picked up.
    #[must_use]
    pub fn applied_fingerprint(&self) -> Option<&str> {
        self.applied_fingerprint.as_deref()
    }

    /// Marks the host dirty. Repeated changes keep the latest reason.
    pub fn mark_dirty(&mut self, reason: DriftReason, at: DateTime<Utc>) {
        self.state = DriftState::Dirty;
        self.reason = Some(reason);
        self.changed_at = Some(at);
    }

    /// Marks the host clean, remembering what it applied.
    pub fn acknowledge(&mut self, applied_fingerprint: Option<String>, at: DateTime<Utc>) {
        self.state = DriftState::Clean;
        self.reason = None;
        self.acknowledged_at = Some(at);
        self.applied_fingerprint = applied_fingerprint;
    }
}
