//! Binding, drift, and materialization through a dashboard session.

use super::helpers::{
    CLAUDE, CURSOR, DEV, FS_DOCS, FS_LOCAL, RESEARCH, SEARCH_REMOTE, TestDashboard, dashboard,
    host, instance, profile,
};
use mcp_hub::binding::domain::{BindingError, DriftState};
use mcp_hub::catalog::domain::{HostStatus, Profile};
use rstest::rstest;
use serde_json::Value;

fn server_keys(dashboard: &TestDashboard, host_id: &str) -> Vec<String> {
    let config = dashboard
        .materialize(&host(host_id))
        .expect("host should exist");
    let parsed: Value = serde_json::from_str(&config.content).expect("content is JSON");
    parsed["mcpServers"]
        .as_object()
        .map(|servers| servers.keys().cloned().collect())
        .unwrap_or_default()
}

#[rstest]
fn adding_to_a_bound_profile_reaches_the_host(mut dashboard: TestDashboard) {
    let members = dashboard
        .add_instance_to_profile(&profile(DEV), &instance(FS_DOCS))
        .expect("profile and instance exist")
        .instance_ids()
        .to_vec();
    assert_eq!(members, vec![instance(FS_LOCAL), instance(FS_DOCS)]);
    assert_eq!(dashboard.drift_state(&host(CLAUDE)), Some(DriftState::Dirty));

    assert_eq!(server_keys(&dashboard, CLAUDE), vec![FS_DOCS, FS_LOCAL]);

    dashboard
        .acknowledge_refresh(&host(CLAUDE))
        .expect("known host");
    assert_eq!(dashboard.drift_state(&host(CLAUDE)), Some(DriftState::Clean));
}

#[rstest]
fn rebinding_to_an_unknown_profile_degrades_to_unbound(mut dashboard: TestDashboard) {
    let resolved = dashboard
        .rebind(&host(CURSOR), Some(profile("unknown-profile")))
        .expect("known host")
        .cloned();

    assert!(resolved.is_none());
    assert_eq!(
        dashboard.bound_profile_id(&host(CURSOR)),
        Some(&profile("unknown-profile"))
    );
    assert!(dashboard.resolve_profile(&profile("unknown-profile")).is_none());
    let config = dashboard
        .materialize(&host(CURSOR))
        .expect("host should exist");
    assert!(config.is_empty());
    assert!(dashboard.needs_refresh(&host(CURSOR)));
}

#[rstest]
#[case(CLAUDE, RESEARCH)]
#[case(CURSOR, DEV)]
#[case(CURSOR, RESEARCH)]
fn rebind_is_visible_to_every_read(
    mut dashboard: TestDashboard,
    #[case] host_id: &str,
    #[case] profile_id: &str,
) {
    dashboard
        .rebind(&host(host_id), Some(profile(profile_id)))
        .expect("known host");

    assert_eq!(dashboard.bound_profile_id(&host(host_id)), Some(&profile(profile_id)));
    assert_eq!(
        dashboard
            .get_host(&host(host_id))
            .and_then(|bound| bound.profile_id()),
        Some(&profile(profile_id))
    );
    assert_eq!(dashboard.drift_state(&host(host_id)), Some(DriftState::Dirty));
}

#[rstest]
fn unbinding_empties_the_configuration(mut dashboard: TestDashboard) {
    dashboard.rebind(&host(CLAUDE), None).expect("known host");

    assert_eq!(dashboard.bound_profile_id(&host(CLAUDE)), None);
    assert!(
        dashboard
            .materialize(&host(CLAUDE))
            .is_some_and(|config| config.is_empty())
    );
}

#[rstest]
fn acknowledgment_clears_only_the_named_host(mut dashboard: TestDashboard) {
    dashboard
        .rebind(&host(CURSOR), Some(profile(DEV)))
        .expect("known host");
    dashboard
        .add_instance_to_profile(&profile(DEV), &instance(SEARCH_REMOTE))
        .expect("profile and instance exist");
    assert_eq!(
        dashboard.hosts_needing_refresh(),
        vec![host(CLAUDE), host(CURSOR)]
    );

    let applied = dashboard
        .acknowledge_refresh(&host(CURSOR))
        .expect("known host");

    assert_eq!(dashboard.hosts_needing_refresh(), vec![host(CLAUDE)]);
    assert_eq!(
        dashboard
            .drift_record(&host(CURSOR))
            .and_then(|record| record.applied_fingerprint())
            .map(str::to_owned),
        Some(applied.fingerprint())
    );
}

#[rstest]
fn acknowledging_an_unknown_host_is_rejected(mut dashboard: TestDashboard) {
    let result = dashboard.acknowledge_refresh(&host("vscode"));

    assert_eq!(result, Err(BindingError::UnknownHost(host("vscode"))));
}

#[rstest]
fn adding_twice_matches_adding_once(mut dashboard: TestDashboard) {
    let once = dashboard
        .add_instance_to_profile(&profile(RESEARCH), &instance(FS_DOCS))
        .expect("profile and instance exist")
        .clone();
    let twice = dashboard
        .add_instance_to_profile(&profile(RESEARCH), &instance(FS_DOCS))
        .expect("profile and instance exist")
        .clone();

    assert_eq!(once, twice);
}

#[rstest]
fn rejected_mutations_change_nothing(mut dashboard: TestDashboard) {
    let before = dashboard.list_profiles().into_iter().cloned().collect::<Vec<_>>();

    assert!(
        dashboard
            .add_instance_to_profile(&profile("missing"), &instance(FS_DOCS))
            .is_err()
    );
    assert!(
        dashboard
            .add_instance_to_profile(&profile(DEV), &instance("missing"))
            .is_err()
    );
    assert!(dashboard.rebind(&host("missing"), Some(profile(DEV))).is_err());

    let after = dashboard.list_profiles().into_iter().cloned().collect::<Vec<_>>();
    assert_eq!(before, after);
    assert!(dashboard.hosts_needing_refresh().is_empty());
}

#[rstest]
fn deleting_a_bound_profile_flags_and_unbinds_its_hosts(mut dashboard: TestDashboard) {
    dashboard.remove_profile(&profile(DEV)).expect("profile exists");

    assert_eq!(dashboard.bound_profile_id(&host(CLAUDE)), Some(&profile(DEV)));
    assert!(dashboard.needs_refresh(&host(CLAUDE)));
    assert!(
        dashboard
            .materialize(&host(CLAUDE))
            .is_some_and(|config| config.is_empty())
    );
}

#[rstest]
fn removing_an_instance_flags_hosts_that_served_it(mut dashboard: TestDashboard) {
    let removed = dashboard.remove_instance(&instance(FS_LOCAL));

    assert!(removed.is_some());
    assert!(dashboard.needs_refresh(&host(CLAUDE)));
    assert!(server_keys(&dashboard, CLAUDE).is_empty());
    assert!(
        dashboard
            .resolve_profile(&profile(DEV))
            .is_some_and(|dev| dev.contains(&instance(FS_LOCAL)))
    );
}

#[rstest]
fn replacing_profiles_rebuilds_the_cache(mut dashboard: TestDashboard) {
    let ops = Profile::new(profile("ops"), "Operations")
        .expect("valid profile")
        .with_instances([instance(SEARCH_REMOTE)]);

    dashboard.replace_profiles([ops]);

    let ids: Vec<&str> = dashboard
        .list_profiles()
        .into_iter()
        .map(|listed| listed.id().as_str())
        .collect();
    assert_eq!(ids, vec!["ops"]);
    assert!(dashboard.needs_refresh(&host(CLAUDE)));
    assert!(!dashboard.needs_refresh(&host(CURSOR)));
}

#[rstest]
fn host_listing_reports_reported_status(mut dashboard: TestDashboard) {
    assert!(dashboard.set_host_status(&host(CURSOR), HostStatus::Connected));

    let statuses: Vec<(String, HostStatus)> = dashboard
        .list_available_hosts()
        .into_iter()
        .map(|summary| (summary.id.to_string(), summary.status))
        .collect();

    assert_eq!(
        statuses,
        vec![
            (CLAUDE.to_owned(), HostStatus::Connected),
            (CURSOR.to_owned(), HostStatus::Connected)
        ]
    );
}

#[rstest]
fn close_returns_the_mutated_catalog(mut dashboard: TestDashboard) {
    dashboard
        .rebind(&host(CURSOR), Some(profile(RESEARCH)))
        .expect("known host");
    dashboard
        .add_instance_to_profile(&profile(RESEARCH), &instance(FS_DOCS))
        .expect("profile and instance exist");

    let snapshot = dashboard.close();

    let cursor = snapshot
        .hosts
        .iter()
        .find(|saved| saved.id() == &host(CURSOR))
        .expect("cursor saved");
    assert_eq!(cursor.profile_id(), Some(&profile(RESEARCH)));
    let research = snapshot
        .profiles
        .iter()
        .find(|saved| saved.id() == &profile(RESEARCH))
        .expect("research saved");
    assert_eq!(research.instance_ids(), [instance(FS_DOCS)].as_slice());
}
