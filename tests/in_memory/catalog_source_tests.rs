//! Opening dashboard sessions from catalog sources.

use super::helpers::{
    CATALOG_JSON, CLAUDE, DEV, FS_LOCAL, catalog, config, host, instance, profile, source,
};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use mcp_hub::{
    catalog::{
        adapters::{json_file::JsonFileCatalogSource, memory::StaticCatalogSource},
        domain::{CatalogIntegrityError, CatalogSnapshot},
        ports::{CatalogSource, CatalogSourceError, CatalogSourceResult},
    },
    config::{ConfigError, DashboardConfig},
    session::{Dashboard, DashboardError},
};
use mockall::mock;
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

mock! {
    Source {}

    #[async_trait]
    impl CatalogSource for Source {
        async fn load(&self) -> CatalogSourceResult<CatalogSnapshot>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_builds_every_cache(source: StaticCatalogSource, config: DashboardConfig) {
    let dashboard = Dashboard::open(&source, config, Arc::new(DefaultClock))
        .await
        .expect("session should open");

    assert_eq!(dashboard.store().list_definitions().len(), 2);
    assert_eq!(dashboard.store().list_instances().len(), 3);
    assert_eq!(dashboard.list_profiles().len(), 2);
    assert_eq!(dashboard.list_available_hosts().len(), 2);
    assert!(
        dashboard
            .resolve_profile(&profile(DEV))
            .is_some_and(|dev| dev.contains(&instance(FS_LOCAL)))
    );
    assert!(dashboard.hosts_needing_refresh().is_empty());
    assert_eq!(
        dashboard
            .get_instance(&instance(FS_LOCAL))
            .and_then(|server| server.request_count()),
        Some(42)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn source_failures_abort_opening(config: DashboardConfig) {
    let mut failing = MockSource::new();
    failing.expect_load().times(1).returning(|| {
        Err(CatalogSourceError::unavailable(std::io::Error::other(
            "catalog service offline",
        )))
    });

    let result = Dashboard::open(&failing, config, Arc::new(DefaultClock)).await;

    assert!(matches!(
        result,
        Err(DashboardError::Source(CatalogSourceError::Unavailable(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inconsistent_catalogs_are_rejected(mut catalog: CatalogSnapshot, config: DashboardConfig) {
    catalog.definitions.clear();
    let mut inconsistent = MockSource::new();
    inconsistent
        .expect_load()
        .returning(move || Ok(catalog.clone()));

    let result = Dashboard::open(&inconsistent, config, Arc::new(DefaultClock)).await;

    assert!(matches!(
        result,
        Err(DashboardError::Integrity(
            CatalogIntegrityError::UnknownDefinition { .. }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_configuration_is_rejected_before_loading() {
    let mut untouched = MockSource::new();
    untouched.expect_load().never();
    let config = DashboardConfig {
        onboarding_key_prefix: String::new(),
        ..DashboardConfig::default()
    };

    let result = Dashboard::open(&untouched, config, Arc::new(DefaultClock)).await;

    assert!(matches!(
        result,
        Err(DashboardError::Config(ConfigError::EmptyOnboardingKeyPrefix))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn json_catalogs_open_from_disk(config: DashboardConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("catalog.json"))
        .expect("temp path is UTF-8");
    std::fs::write(&path, CATALOG_JSON).expect("catalog written");

    let dashboard = Dashboard::open(
        &JsonFileCatalogSource::new(path),
        config,
        Arc::new(DefaultClock),
    )
    .await
    .expect("session should open");

    let claude = dashboard
        .materialize(&host(CLAUDE))
        .expect("host should exist");
    assert_eq!(
        claude.path,
        "/home/ada/Library/Application Support/Claude/claude_desktop_config.json"
    );
    assert!(claude.content.contains(FS_LOCAL));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_sessions_reopen_unchanged(source: StaticCatalogSource, config: DashboardConfig) {
    let first = Dashboard::open(&source, config.clone(), Arc::new(DefaultClock))
        .await
        .expect("session should open");
    let saved = first.close();

    let reopened = Dashboard::open(
        &StaticCatalogSource::new(saved.clone()),
        config,
        Arc::new(DefaultClock),
    )
    .await
    .expect("session should reopen");

    assert_eq!(reopened.close(), saved);
}
