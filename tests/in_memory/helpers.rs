//! Shared test helpers for in-memory dashboard integration tests.

use mcp_hub::{
    catalog::{
        adapters::memory::StaticCatalogSource,
        domain::{CatalogSnapshot, HostId, InstanceId, ProfileId},
    },
    config::DashboardConfig,
    session::Dashboard,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Catalog fixture shared by integration tests.
pub const CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");

/// Host bound to `dev` in the fixture.
pub const CLAUDE: &str = "claude-desktop";
/// Unbound host in the fixture.
pub const CURSOR: &str = "cursor";
/// Profile holding `fs-local`.
pub const DEV: &str = "dev";
/// Empty profile.
pub const RESEARCH: &str = "research";
/// Running stdio instance in `dev`.
pub const FS_LOCAL: &str = "fs-local";
/// Stopped stdio instance outside any profile.
pub const FS_DOCS: &str = "fs-docs";
/// SSE instance outside any profile.
pub const SEARCH_REMOTE: &str = "search-remote";

/// Session type used throughout the integration tests.
pub type TestDashboard = Dashboard<DefaultClock>;

/// Parses the catalog fixture.
#[fixture]
pub fn catalog() -> CatalogSnapshot {
    serde_json::from_str(CATALOG_JSON).expect("fixture catalog should parse")
}

/// Configuration with a fixed home directory.
#[fixture]
pub fn config() -> DashboardConfig {
    DashboardConfig {
        home_dir: "/home/ada".to_owned(),
        ..DashboardConfig::default()
    }
}

/// Builds a session over the catalog fixture.
#[fixture]
pub fn dashboard(catalog: CatalogSnapshot, config: DashboardConfig) -> TestDashboard {
    Dashboard::from_snapshot(catalog, config, Arc::new(DefaultClock))
        .expect("fixture session should open")
}

/// Wraps the catalog fixture in a static source.
#[fixture]
pub fn source(catalog: CatalogSnapshot) -> StaticCatalogSource {
    StaticCatalogSource::new(catalog)
}

/// Builds a host identifier.
pub fn host(value: &str) -> HostId {
    HostId::new(value).expect("valid host id")
}

/// Builds a profile identifier.
pub fn profile(value: &str) -> ProfileId {
    ProfileId::new(value).expect("valid profile id")
}

/// Builds an instance identifier.
pub fn instance(value: &str) -> InstanceId {
    InstanceId::new(value).expect("valid instance id")
}
