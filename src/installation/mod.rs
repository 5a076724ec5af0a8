//! Guided installation of a server definition as a new instance.
//!
//! Each phase of the flow is a variant carrying only the data valid in that
//! phase; transitions are methods on [`InstallationFlow`].

mod flow;

pub use flow::{InstallationError, InstallationFlow, InstallationPhase, InstanceDraft};

#[cfg(test)]
mod tests;
