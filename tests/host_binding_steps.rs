//! Behaviour tests for host-profile binding and drift tracking.

use std::sync::Arc;

use eyre::{WrapErr, eyre};
use mcp_hub::{
    binding::domain::DriftState,
    catalog::domain::{CatalogSnapshot, HostId, InstanceId, ProfileId},
    config::DashboardConfig,
    session::Dashboard,
};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const CATALOG_JSON: &str = include_str!("fixtures/catalog.json");

#[derive(Default)]
struct HostBindingWorld {
    dashboard: Option<Dashboard<DefaultClock>>,
}

impl HostBindingWorld {
    fn dashboard(&self) -> Result<&Dashboard<DefaultClock>, eyre::Report> {
        self.dashboard
            .as_ref()
            .ok_or_else(|| eyre!("catalog should be loaded"))
    }

    fn dashboard_mut(&mut self) -> Result<&mut Dashboard<DefaultClock>, eyre::Report> {
        self.dashboard
            .as_mut()
            .ok_or_else(|| eyre!("catalog should be loaded"))
    }
}

#[fixture]
fn world() -> HostBindingWorld {
    HostBindingWorld::default()
}

fn host_id(value: &str) -> Result<HostId, eyre::Report> {
    HostId::new(value).wrap_err("valid host id expected")
}

fn profile_id(value: &str) -> Result<ProfileId, eyre::Report> {
    ProfileId::new(value).wrap_err("valid profile id expected")
}

fn instance_id(value: &str) -> Result<InstanceId, eyre::Report> {
    InstanceId::new(value).wrap_err("valid instance id expected")
}

fn split_list(values: &str) -> Vec<&str> {
    values.split(',').map(str::trim).collect()
}

#[given("the sample catalog is loaded")]
fn sample_catalog_loaded(world: &mut HostBindingWorld) -> Result<(), eyre::Report> {
    let snapshot: CatalogSnapshot =
        serde_json::from_str(CATALOG_JSON).wrap_err("fixture catalog should parse")?;
    let dashboard = Dashboard::from_snapshot(
        snapshot,
        DashboardConfig::default(),
        Arc::new(DefaultClock),
    )
    .wrap_err("session should open")?;
    world.dashboard = Some(dashboard);
    Ok(())
}

#[given(r#"host "{host}" starts bound to profile "{profile}""#)]
fn host_starts_bound(
    world: &mut HostBindingWorld,
    host: String,
    profile: String,
) -> Result<(), eyre::Report> {
    let bound = world.dashboard()?.bound_profile_id(&host_id(&host)?).cloned();
    if bound != Some(profile_id(&profile)?) {
        return Err(eyre!("expected {host} bound to {profile}, got {bound:?}"));
    }
    Ok(())
}

#[when(r#"instance "{instance}" is added to profile "{profile}""#)]
fn add_instance(
    world: &mut HostBindingWorld,
    instance: String,
    profile: String,
) -> Result<(), eyre::Report> {
    let target = profile_id(&profile)?;
    let member = instance_id(&instance)?;
    world
        .dashboard_mut()?
        .add_instance_to_profile(&target, &member)
        .wrap_err("instance should be added")?;
    Ok(())
}

#[when(r#"host "{host}" is rebound to profile "{profile}""#)]
fn rebind_host(
    world: &mut HostBindingWorld,
    host: String,
    profile: String,
) -> Result<(), eyre::Report> {
    let target = host_id(&host)?;
    let bound = profile_id(&profile)?;
    world
        .dashboard_mut()?
        .rebind(&target, Some(bound))
        .wrap_err("rebind should succeed")?;
    Ok(())
}

#[when(r#"host "{host}" acknowledges the refresh"#)]
fn acknowledge_refresh(world: &mut HostBindingWorld, host: String) -> Result<(), eyre::Report> {
    let target = host_id(&host)?;
    world
        .dashboard_mut()?
        .acknowledge_refresh(&target)
        .wrap_err("acknowledgment should succeed")?;
    Ok(())
}

#[when(r#"profile "{profile}" is deleted"#)]
fn delete_profile(world: &mut HostBindingWorld, profile: String) -> Result<(), eyre::Report> {
    let target = profile_id(&profile)?;
    world
        .dashboard_mut()?
        .remove_profile(&target)
        .wrap_err("profile should be deleted")?;
    Ok(())
}

#[then(r#"profile "{profile}" lists instances "{instances}""#)]
fn profile_lists_instances(
    world: &HostBindingWorld,
    profile: String,
    instances: String,
) -> Result<(), eyre::Report> {
    let resolved = world
        .dashboard()?
        .resolve_profile(&profile_id(&profile)?)
        .ok_or_else(|| eyre!("profile {profile} should resolve"))?;
    let actual: Vec<&str> = resolved
        .instance_ids()
        .iter()
        .map(InstanceId::as_str)
        .collect();
    let expected = split_list(&instances);
    if actual != expected {
        return Err(eyre!("expected members {expected:?}, got {actual:?}"));
    }
    Ok(())
}

#[then(r#"profile "{profile}" does not resolve"#)]
fn profile_does_not_resolve(world: &HostBindingWorld, profile: String) -> Result<(), eyre::Report> {
    if world
        .dashboard()?
        .resolve_profile(&profile_id(&profile)?)
        .is_some()
    {
        return Err(eyre!("profile {profile} should not resolve"));
    }
    Ok(())
}

#[then(r#"host "{host}" reports bound profile "{profile}""#)]
fn host_reports_binding(
    world: &HostBindingWorld,
    host: String,
    profile: String,
) -> Result<(), eyre::Report> {
    let bound = world.dashboard()?.bound_profile_id(&host_id(&host)?).cloned();
    if bound != Some(profile_id(&profile)?) {
        return Err(eyre!("expected {host} bound to {profile}, got {bound:?}"));
    }
    Ok(())
}

#[then(r#"host "{host}" needs a refresh"#)]
fn host_needs_refresh(world: &HostBindingWorld, host: String) -> Result<(), eyre::Report> {
    let state = world.dashboard()?.drift_state(&host_id(&host)?);
    if state != Some(DriftState::Dirty) {
        return Err(eyre!("expected {host} to be dirty, got {state:?}"));
    }
    Ok(())
}

#[then(r#"host "{host}" is clean"#)]
fn host_is_clean(world: &HostBindingWorld, host: String) -> Result<(), eyre::Report> {
    let state = world.dashboard()?.drift_state(&host_id(&host)?);
    if state != Some(DriftState::Clean) {
        return Err(eyre!("expected {host} to be clean, got {state:?}"));
    }
    Ok(())
}

#[then(r#"the configuration for host "{host}" lists "{instances}""#)]
fn configuration_lists(
    world: &HostBindingWorld,
    host: String,
    instances: String,
) -> Result<(), eyre::Report> {
    let config = world
        .dashboard()?
        .materialize(&host_id(&host)?)
        .ok_or_else(|| eyre!("host {host} should exist"))?;
    let parsed: serde_json::Value =
        serde_json::from_str(&config.content).wrap_err("content should be JSON")?;
    let actual: Vec<&str> = parsed["mcpServers"]
        .as_object()
        .ok_or_else(|| eyre!("mcpServers should be an object"))?
        .keys()
        .map(String::as_str)
        .collect();
    let expected = split_list(&instances);
    if actual != expected {
        return Err(eyre!("expected servers {expected:?}, got {actual:?}"));
    }
    Ok(())
}

#[then(r#"the configuration for host "{host}" is empty"#)]
fn configuration_is_empty(world: &HostBindingWorld, host: String) -> Result<(), eyre::Report> {
    let config = world
        .dashboard()?
        .materialize(&host_id(&host)?)
        .ok_or_else(|| eyre!("host {host} should exist"))?;
    if !config.is_empty() {
        return Err(eyre!("expected empty configuration, got {}", config.content));
    }
    Ok(())
}

#[scenario(
    path = "tests/features/host_binding.feature",
    name = "Adding an instance to a bound profile marks the host for refresh"
)]
fn adding_instance_marks_host(world: HostBindingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/host_binding.feature",
    name = "Binding a host to an unknown profile leaves it unbound"
)]
fn binding_unknown_profile(world: HostBindingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/host_binding.feature",
    name = "Acknowledging one host leaves the others pending"
)]
fn acknowledging_one_host(world: HostBindingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/host_binding.feature",
    name = "Deleting a bound profile leaves its hosts unbound"
)]
fn deleting_bound_profile(world: HostBindingWorld) {
    let _ = world;
}
