//! Domain model for host bindings, drift tracking, and configuration
//! payloads.

mod drift;
mod error;
mod payload;

pub use drift::{DriftReason, DriftRecord, DriftState};
pub use error::BindingError;
pub use payload::{HostConfiguration, MaterializedConfig, ServerEntry};
