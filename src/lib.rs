//! MCP Hub: server catalog, profiles, and host configuration sync.
//!
//! This crate keeps track of MCP server definitions, the instances created
//! from them, the profiles that bundle instances, and the host applications
//! that consume a profile. It renders each host's effective configuration
//! and tracks when a host has fallen behind its bound profile.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure entity and state-machine logic
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: In-memory and file-backed implementations of ports
//!
//! # Modules
//!
//! - [`catalog`]: Definitions, instances, profiles, hosts, and the entity store
//! - [`binding`]: Profile resolution, host bindings, materialization, drift
//! - [`installation`]: Phase-typed installation flow
//! - [`onboarding`]: Persisted "seen" flags for onboarding flows
//! - [`session`]: Session-scoped [`session::Dashboard`] façade
//! - [`config`]: Dashboard configuration

pub mod binding;
pub mod catalog;
pub mod config;
mod fs_utils;
pub mod installation;
pub mod onboarding;
pub mod session;

#[cfg(test)]
pub(crate) mod test_fixtures;
