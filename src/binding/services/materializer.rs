//! Renders a host's effective configuration on demand.

use super::BindingManager;
use crate::binding::domain::{HostConfiguration, MaterializedConfig, ServerEntry};
use crate::catalog::{
    domain::{Host, HostId, HostKind},
    services::EntityStore,
};
use crate::config::DashboardConfig;
use minijinja::{Environment, context};
use mockable::Clock;
use std::collections::BTreeMap;

/// Serializes the configuration a host should be running.
///
/// Nothing is cached: every call reads the current binding and profile, so
/// the result always reflects the latest mutation.
#[derive(Debug)]
pub struct ConfigMaterializer {
    environment: Environment<'static>,
    home_dir: String,
    path_templates: BTreeMap<HostKind, String>,
}

impl ConfigMaterializer {
    /// Creates a materializer using the configured path templates.
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            environment: Environment::new(),
            home_dir: config.home_dir.clone(),
            path_templates: config.host_config_paths.clone(),
        }
    }

    /// Produces the displayable configuration for a host.
    ///
    /// Returns `None` only when the host does not exist. A host that is
    /// unbound, or bound to a profile that no longer resolves, yields an
    /// empty payload. Profile members that no longer exist are skipped.
    #[must_use]
    pub fn materialize<C>(
        &self,
        store: &EntityStore,
        bindings: &BindingManager<C>,
        host_id: &HostId,
    ) -> Option<MaterializedConfig>
    where
        C: Clock + Send + Sync,
    {
        let host = store.get_host(host_id)?;
        let path = self.config_path(host);

        let Some(profile) = bindings.bound_profile(host_id) else {
            if let Some(profile_id) = bindings.bound_profile_id(host_id) {
                tracing::warn!(
                    host_id = %host_id,
                    profile_id = %profile_id,
                    "bound profile does not resolve; materializing as unbound"
                );
            }
            return Some(MaterializedConfig::empty(path));
        };

        let mut configuration = HostConfiguration::default();
        for instance_id in profile.instance_ids() {
            let Some(instance) = store.get_instance(instance_id) else {
                tracing::warn!(
                    profile_id = %profile.id(),
                    instance_id = %instance_id,
                    "skipping unknown profile member"
                );
                continue;
            };
            let Some(definition) = store.get_definition(instance.definition_id()) else {
                tracing::warn!(
                    instance_id = %instance_id,
                    definition_id = %instance.definition_id(),
                    "skipping profile member with unknown definition"
                );
                continue;
            };
            configuration.mcp_servers.insert(
                instance_id.to_string(),
                ServerEntry::for_instance(definition.endpoint(), instance),
            );
        }

        let content = match render_pretty(&configuration) {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(host_id = %host_id, error = %err, "configuration serialization failed");
                return Some(MaterializedConfig::empty(path));
            }
        };

        tracing::debug!(
            host_id = %host_id,
            profile_id = %profile.id(),
            servers = configuration.mcp_servers.len(),
            "configuration materialized"
        );
        Some(MaterializedConfig { path, content })
    }

    /// Resolves where a host reads its configuration from.
    ///
    /// A per-host override wins over the template for the host's kind. A
    /// template that fails to render falls back to its raw text.
    #[must_use]
    pub fn config_path(&self, host: &Host) -> String {
        if let Some(path) = host.config_path() {
            return path.to_owned();
        }

        let Some(template) = self.path_templates.get(&host.kind()) else {
            return String::new();
        };

        self.environment
            .render_str(
                template,
                context! {
                    home => self.home_dir.as_str(),
                    host_id => host.id().as_str(),
                    host_name => host.name(),
                },
            )
            .unwrap_or_else(|err| {
                tracing::warn!(
                    host_id = %host.id(),
                    error = %err,
                    "config path template failed to render"
                );
                template.clone()
            })
    }
}

fn render_pretty(configuration: &HostConfiguration) -> serde_json::Result<String> {
    let value = serde_json::to_value(configuration)?;
    serde_json::to_string_pretty(&value)
}
