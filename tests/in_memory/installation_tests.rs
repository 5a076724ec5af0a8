//! Guided installation through a dashboard session.

use super::helpers::{CLAUDE, DEV, FS_LOCAL, TestDashboard, dashboard, host, instance, profile};
use mcp_hub::{
    binding::domain::{BindingError, DriftState},
    catalog::domain::{DefinitionId, InstanceStatus},
    installation::{InstallationFlow, InstallationPhase, InstanceDraft},
    session::InstallError,
};
use rstest::rstest;

fn definition(value: &str) -> DefinitionId {
    DefinitionId::new(value).expect("valid definition id")
}

fn configured_flow(dashboard: &TestDashboard, draft: InstanceDraft) -> InstallationFlow {
    let mut flow = InstallationFlow::new();
    flow.select(dashboard.store(), definition("web-search"))
        .expect("definition exists");
    flow.configure(draft).expect("definition selected");
    flow
}

#[rstest]
fn installing_into_a_bound_profile_dirties_its_hosts(mut dashboard: TestDashboard) {
    let draft = InstanceDraft::new("Search staging", "https://staging.example.com/sse")
        .with_env_var("API_KEY", "staging-key")
        .into_profile(profile(DEV));
    let mut flow = configured_flow(&dashboard, draft);

    let installed = dashboard.install(&mut flow).expect("install should succeed");

    assert_eq!(installed.status(), InstanceStatus::Stopped);
    assert!(installed.id().as_str().starts_with("instance-"));
    assert!(
        dashboard
            .resolve_profile(&profile(DEV))
            .is_some_and(|dev| dev.contains(installed.id()) && dev.contains(&instance(FS_LOCAL)))
    );
    assert_eq!(dashboard.drift_state(&host(CLAUDE)), Some(DriftState::Dirty));
    let config = dashboard
        .materialize(&host(CLAUDE))
        .expect("host should exist");
    assert!(config.content.contains("https://staging.example.com/sse"));
    assert!(matches!(flow.phase(), InstallationPhase::Installed { .. }));
}

#[rstest]
fn installing_without_a_profile_touches_no_host(mut dashboard: TestDashboard) {
    let mut flow = configured_flow(
        &dashboard,
        InstanceDraft::new("Search staging", "https://staging.example.com/sse"),
    );

    let installed = dashboard.install(&mut flow).expect("install should succeed");

    assert!(dashboard.get_instance(installed.id()).is_some());
    assert!(dashboard.hosts_needing_refresh().is_empty());
}

#[rstest]
fn unknown_target_profiles_keep_the_instance(mut dashboard: TestDashboard) {
    let draft = InstanceDraft::new("Search staging", "https://staging.example.com/sse")
        .into_profile(profile("missing"));
    let mut flow = configured_flow(&dashboard, draft);

    let result = dashboard.install(&mut flow);

    match result {
        Err(InstallError::Binding {
            instance_id,
            source,
        }) => {
            assert_eq!(source, BindingError::UnknownProfile(profile("missing")));
            assert!(dashboard.get_instance(&instance_id).is_some());
            assert_eq!(
                flow.phase(),
                &InstallationPhase::Installed {
                    instance_id,
                    profile_id: None,
                }
            );
        }
        other => panic!("expected a binding failure, got {other:?}"),
    }
}

#[rstest]
fn installing_an_idle_flow_is_rejected(mut dashboard: TestDashboard) {
    let mut flow = InstallationFlow::new();

    let result = dashboard.install(&mut flow);

    assert!(matches!(result, Err(InstallError::Installation(_))));
    assert_eq!(dashboard.store().list_instances().len(), 3);
}
