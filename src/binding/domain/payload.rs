//! Materialized host configuration payloads.

use crate::catalog::domain::{EndpointKind, ServerInstance};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Configuration file contents a host reads to discover its MCP servers.
///
/// Fields are declared in lexical order and maps are `BTreeMap`s so the
/// serialized form has stable key ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostConfiguration {
    /// Server entries keyed by instance identifier.
    #[serde(rename = "mcpServers")]
    pub mcp_servers: BTreeMap<String, ServerEntry>,
}

/// One server entry in a [`HostConfiguration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServerEntry {
    /// Launch a local process.
    Stdio {
        /// Arguments appended to the command.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        /// Executable to launch.
        command: String,
        /// Environment passed to the process.
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
    },
    /// Connect to a remote SSE endpoint.
    Sse {
        /// Environment values forwarded to the endpoint.
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
        /// Endpoint URL.
        url: String,
    },
}

impl ServerEntry {
    /// Builds the entry for an instance of a definition with `endpoint`.
    ///
    /// For stdio instances the connection string may itself carry leading
    /// arguments; they are placed before the instance's argument string.
    #[must_use]
    pub fn for_instance(endpoint: EndpointKind, instance: &ServerInstance) -> Self {
        let env = instance.env().cloned().unwrap_or_default();
        match endpoint {
            EndpointKind::Stdio => {
                let mut words = split_words(instance.connection()).into_iter();
                let command = words.next().unwrap_or_default();
                let args = words
                    .chain(split_words(instance.arguments().unwrap_or_default()))
                    .collect();
                Self::Stdio { args, command, env }
            }
            EndpointKind::Sse => Self::Sse {
                env,
                url: instance.connection().to_owned(),
            },
        }
    }
}

/// Splits a command line with shell quoting rules.
///
/// Unbalanced quotes fall back to plain whitespace splitting.
fn split_words(text: &str) -> Vec<String> {
    shell_words::split(text).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "command line is not shell-quoted; splitting on whitespace");
        text.split_whitespace().map(str::to_owned).collect()
    })
}

/// Displayable configuration for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedConfig {
    /// Where the host reads its configuration from.
    pub path: String,
    /// Pretty-printed configuration, empty when the host has no profile.
    pub content: String,
}

impl MaterializedConfig {
    /// Creates the placeholder payload for a host without a usable profile.
    #[must_use]
    pub const fn empty(path: String) -> Self {
        Self {
            path,
            content: String::new(),
        }
    }

    /// Returns whether the payload is the "nothing configured" placeholder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the SHA-256 of the content as lowercase hex.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.content.as_bytes());
        format!("{digest:x}")
    }
}
