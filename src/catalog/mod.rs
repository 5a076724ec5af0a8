//! Server catalog: definitions, instances, profiles, and hosts.
//!
//! The catalog is the source of truth for every entity the dashboard shows.
//! It is loaded once per session through a [`ports::CatalogSource`] and
//! mutated only by explicit instance-management actions. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
