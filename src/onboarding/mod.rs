//! Persistence of "has the user seen this onboarding flow" flags.
//!
//! Flags live behind a plain key-value boundary, the only persisted state
//! the dashboard keeps.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
