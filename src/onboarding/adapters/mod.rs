//! Adapter implementations for the key-value storage port.

pub mod json_file;
pub mod memory;
