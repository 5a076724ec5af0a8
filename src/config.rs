//! Dashboard configuration.
//!
//! Configuration is a JSON document; every field is optional and falls back
//! to [`DashboardConfig::default`].

use crate::catalog::domain::HostKind;
use crate::fs_utils;
use camino::Utf8Path;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default prefix for onboarding flag storage keys.
pub const DEFAULT_ONBOARDING_KEY_PREFIX: &str = "mcp-hub.onboarding.";

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`DashboardConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A host configuration path template does not compile.
    #[error("invalid config path template for {kind}: {reason}")]
    InvalidPathTemplate {
        /// Host kind the template belongs to.
        kind: HostKind,
        /// Template compiler message.
        reason: String,
    },

    /// The onboarding key prefix is empty.
    #[error("onboarding key prefix must not be empty")]
    EmptyOnboardingKeyPrefix,
}

/// Settings shared by the dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Value of the `home` variable in path templates.
    pub home_dir: String,
    /// Configuration file location per host kind, as `minijinja` templates
    /// over `home`, `host_id`, and `host_name`.
    pub host_config_paths: BTreeMap<HostKind, String>,
    /// Prefix prepended to every onboarding flag storage key.
    pub onboarding_key_prefix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let host_config_paths = BTreeMap::from([
            (
                HostKind::ClaudeDesktop,
                "{{ home }}/Library/Application Support/Claude/claude_desktop_config.json"
                    .to_owned(),
            ),
            (HostKind::Cursor, "{{ home }}/.cursor/mcp.json".to_owned()),
            (
                HostKind::Windsurf,
                "{{ home }}/.codeium/windsurf/mcp_config.json".to_owned(),
            ),
            (
                HostKind::Custom,
                "{{ home }}/.config/mcp/{{ host_id }}.json".to_owned(),
            ),
        ]);

        Self {
            home_dir: "~".to_owned(),
            host_config_paths,
            onboarding_key_prefix: DEFAULT_ONBOARDING_KEY_PREFIX.to_owned(),
        }
    }
}

impl DashboardConfig {
    /// Parses and validates configuration from JSON text.
    ///
    /// Host kinds missing from `host_config_paths` keep their default
    /// template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(contents)?;
        for (kind, template) in Self::default().host_config_paths {
            config.host_config_paths.entry(kind).or_insert(template);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = fs_utils::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path, "configuration loaded");
        Ok(config)
    }

    /// Checks that every path template compiles and the key prefix is set.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.onboarding_key_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyOnboardingKeyPrefix);
        }

        let environment = Environment::new();
        for (kind, template) in &self.host_config_paths {
            environment
                .template_from_str(template)
                .map_err(|err| ConfigError::InvalidPathTemplate {
                    kind: *kind,
                    reason: err.to_string(),
                })?;
        }
        Ok(())
    }

    /// Returns the path template for a host kind.
    #[must_use]
    pub fn path_template(&self, kind: HostKind) -> Option<&str> {
        self.host_config_paths.get(&kind).map(String::as_str)
    }
}
