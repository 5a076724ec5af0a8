//! Simulated instance runtime.

use crate::catalog::{
    domain::{InstanceId, ServerDefinition, ServerInstance},
    ports::{InstanceProbe, InstanceRuntime, InstanceRuntimeError, InstanceRuntimeResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Instance runtime that models status changes without spawning processes
/// or opening connections.
///
/// Launch failures, crashes, and request traffic are scripted through the
/// `fail_*` and `record_traffic` methods.
#[derive(Debug, Clone, Default)]
pub struct SimulatedInstanceRuntime {
    state: Arc<RwLock<SimulatedRuntimeState>>,
}

#[derive(Debug, Default)]
struct SimulatedRuntimeState {
    running: HashSet<InstanceId>,
    launch_failures: HashMap<InstanceId, String>,
    crashed: HashMap<InstanceId, String>,
    pending_requests: HashMap<InstanceId, u64>,
}

fn lock_poisoned(err: impl ToString) -> InstanceRuntimeError {
    InstanceRuntimeError::runtime(std::io::Error::other(err.to_string()))
}

impl SimulatedInstanceRuntime {
    /// Creates a runtime with no running instances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next launches of `instance_id` fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_launch(
        &self,
        instance_id: InstanceId,
        reason: impl Into<String>,
    ) -> InstanceRuntimeResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .launch_failures
            .insert(instance_id, reason.into().trim().to_owned());
        Ok(())
    }

    /// Makes a running instance report a failure on its next probe.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn crash(
        &self,
        instance_id: InstanceId,
        message: impl Into<String>,
    ) -> InstanceRuntimeResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .crashed
            .insert(instance_id, message.into().trim().to_owned());
        Ok(())
    }

    /// Queues served requests to be reported by the next probe.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn record_traffic(&self, instance_id: InstanceId, requests: u64) -> InstanceRuntimeResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let pending = state.pending_requests.entry(instance_id).or_default();
        *pending = pending.saturating_add(requests);
        Ok(())
    }
}

#[async_trait]
impl InstanceRuntime for SimulatedInstanceRuntime {
    async fn connect(
        &self,
        _definition: &ServerDefinition,
        instance: &ServerInstance,
    ) -> InstanceRuntimeResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if let Some(reason) = state.launch_failures.get(instance.id()) {
            return Err(InstanceRuntimeError::LaunchFailed {
                instance_id: instance.id().clone(),
                reason: reason.clone(),
            });
        }

        state.running.insert(instance.id().clone());
        state.crashed.remove(instance.id());
        Ok(())
    }

    async fn disconnect(&self, instance: &ServerInstance) -> InstanceRuntimeResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state.running.remove(instance.id());
        state.crashed.remove(instance.id());
        state.pending_requests.remove(instance.id());
        Ok(())
    }

    async fn probe(&self, instance: &ServerInstance) -> InstanceRuntimeResult<InstanceProbe> {
        let mut state = self.state.write().map_err(lock_poisoned)?;

        if !state.running.contains(instance.id()) {
            return Ok(InstanceProbe::Unreachable);
        }

        if let Some(message) = state.crashed.get(instance.id()) {
            return Ok(InstanceProbe::Failed {
                message: message.clone(),
            });
        }

        let requests = state
            .pending_requests
            .remove(instance.id())
            .unwrap_or_default();
        Ok(InstanceProbe::Healthy { requests })
    }
}
