//! Adapter implementations for catalog ports.

pub mod json_file;
pub mod memory;

mod runtime;

pub use runtime::SimulatedInstanceRuntime;
