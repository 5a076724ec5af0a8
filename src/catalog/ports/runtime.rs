//! Runtime port for bringing server instances up and down.

use crate::catalog::domain::{InstanceId, ServerDefinition, ServerInstance};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for instance runtime operations.
pub type InstanceRuntimeResult<T> = Result<T, InstanceRuntimeError>;

/// Observation returned by [`InstanceRuntime::probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceProbe {
    /// Instance answers and has served `requests` requests since last probed.
    Healthy {
        /// Requests served since the previous probe.
        requests: u64,
    },
    /// Instance is not reachable.
    Unreachable,
    /// Instance answered with a failure.
    Failed {
        /// Failure reported by the instance.
        message: String,
    },
}

/// Runtime control contract for server instances.
///
/// The dashboard never speaks MCP itself; adapters report status on its
/// behalf.
#[async_trait]
pub trait InstanceRuntime: Send + Sync {
    /// Launches or connects to an instance.
    async fn connect(
        &self,
        definition: &ServerDefinition,
        instance: &ServerInstance,
    ) -> InstanceRuntimeResult<()>;

    /// Shuts down or disconnects from an instance.
    async fn disconnect(&self, instance: &ServerInstance) -> InstanceRuntimeResult<()>;

    /// Reports the current condition of an instance.
    async fn probe(&self, instance: &ServerInstance) -> InstanceRuntimeResult<InstanceProbe>;
}

/// Errors returned by instance runtime adapters.
#[derive(Debug, Clone, Error)]
pub enum InstanceRuntimeError {
    /// The instance refused or failed to start.
    #[error("instance {instance_id} failed to start: {reason}")]
    LaunchFailed {
        /// Instance identifier.
        instance_id: InstanceId,
        /// Failure reason.
        reason: String,
    },

    /// Generic runtime failure.
    #[error("instance runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl InstanceRuntimeError {
    /// Wraps a runtime error from the adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
