//! Application services for host bindings.

mod manager;
mod materializer;
mod notifier;
mod resolver;

pub use manager::BindingManager;
pub use materializer::ConfigMaterializer;
pub use notifier::DriftNotifier;
pub use resolver::ProfileResolver;
