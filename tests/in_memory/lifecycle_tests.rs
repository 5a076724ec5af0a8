//! Instance lifecycle driven through a dashboard session.

use super::helpers::{CLAUDE, FS_DOCS, FS_LOCAL, TestDashboard, dashboard, host, instance};
use mcp_hub::catalog::{
    adapters::SimulatedInstanceRuntime,
    domain::{DefinitionId, InstanceStatus},
    services::InstanceLifecycleService,
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_probe_and_stop_an_instance(mut dashboard: TestDashboard) {
    let runtime = Arc::new(SimulatedInstanceRuntime::new());
    let service = InstanceLifecycleService::new(runtime.clone(), Arc::new(DefaultClock));
    let docs = instance(FS_DOCS);

    dashboard
        .start_instance(&service, &docs)
        .await
        .expect("start should succeed");
    runtime
        .record_traffic(docs.clone(), 3)
        .expect("scripting should succeed");
    let refreshed = dashboard
        .refresh_instance(&service, &docs)
        .await
        .expect("refresh should succeed");
    assert_eq!(refreshed.status(), InstanceStatus::Running);
    assert_eq!(refreshed.request_count(), Some(3));

    dashboard
        .stop_instance(&service, &docs)
        .await
        .expect("stop should succeed");
    assert_eq!(
        dashboard.get_instance(&docs).map(|server| server.status()),
        Some(InstanceStatus::Stopped)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_changes_do_not_dirty_hosts(mut dashboard: TestDashboard) {
    let runtime = Arc::new(SimulatedInstanceRuntime::new());
    let service = InstanceLifecycleService::new(runtime, Arc::new(DefaultClock));

    dashboard
        .refresh_instance(&service, &instance(FS_LOCAL))
        .await
        .expect("refresh should succeed");

    assert_eq!(
        dashboard
            .get_instance(&instance(FS_LOCAL))
            .map(|server| server.status()),
        Some(InstanceStatus::Error)
    );
    assert!(dashboard.hosts_needing_refresh().is_empty());
}

#[rstest]
fn instances_are_listed_per_definition_in_store_order(dashboard: TestDashboard) {
    let filesystem = DefinitionId::new("filesystem").expect("valid definition id");

    let listed: Vec<&str> = dashboard
        .list_instances_by_definition(&filesystem)
        .map(|server| server.id().as_str())
        .collect();

    assert_eq!(listed, vec![FS_LOCAL, FS_DOCS]);
}

#[rstest]
fn removing_an_instance_after_acknowledgment_dirties_bound_hosts(mut dashboard: TestDashboard) {
    let claude = host(CLAUDE);
    let before = dashboard
        .acknowledge_refresh(&claude)
        .expect("acknowledgment should succeed");

    dashboard
        .remove_instance(&instance(FS_LOCAL))
        .expect("instance should exist");

    let after = dashboard.materialize(&claude).expect("host should exist");
    assert_ne!(after.content, before.content);
    assert!(!after.content.contains(FS_LOCAL));
    assert!(dashboard.needs_refresh(&claude));
}
