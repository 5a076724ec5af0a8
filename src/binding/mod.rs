//! Host-to-profile bindings and configuration sync.
//!
//! This module resolves profiles, owns which profile each host is bound to,
//! renders the configuration a host should load, and tracks per host whether
//! that configuration changed since the host last reloaded it.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
