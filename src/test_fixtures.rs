//! Shared catalog fixtures for unit tests.

use crate::catalog::domain::{
    CatalogSnapshot, DefinitionId, EndpointKind, Host, HostId, HostKind, HostStatus, InstanceId,
    InstanceStatus, Profile, ProfileId, ServerDefinition, ServerInstance,
};
use rstest::fixture;

pub(crate) const FILESYSTEM: &str = "filesystem";
pub(crate) const WEB_SEARCH: &str = "web-search";
pub(crate) const FS_LOCAL: &str = "fs-local";
pub(crate) const FS_DOCS: &str = "fs-docs";
pub(crate) const SEARCH_REMOTE: &str = "search-remote";
pub(crate) const DEV: &str = "dev";
pub(crate) const RESEARCH: &str = "research";
pub(crate) const CLAUDE: &str = "claude-desktop";
pub(crate) const CURSOR: &str = "cursor";

pub(crate) fn definition_id(value: &str) -> DefinitionId {
    DefinitionId::new(value).expect("valid definition id")
}

pub(crate) fn instance_id(value: &str) -> InstanceId {
    InstanceId::new(value).expect("valid instance id")
}

pub(crate) fn profile_id(value: &str) -> ProfileId {
    ProfileId::new(value).expect("valid profile id")
}

pub(crate) fn host_id(value: &str) -> HostId {
    HostId::new(value).expect("valid host id")
}

pub(crate) fn instance(id: &str, definition: &str, connection: &str) -> ServerInstance {
    ServerInstance::new(
        instance_id(id),
        id.replace('-', " "),
        definition_id(definition),
        connection,
    )
    .expect("valid instance")
}

/// Two definitions, three instances, `dev` holding `fs-local`, an empty
/// `research` profile, `claude-desktop` bound to `dev`, and an unbound
/// `cursor`.
#[fixture]
pub(crate) fn snapshot() -> CatalogSnapshot {
    let definitions = vec![
        ServerDefinition::new(
            definition_id(FILESYSTEM),
            "Filesystem",
            EndpointKind::Stdio,
            "1.2.0",
        )
        .expect("valid definition")
        .with_description("Read and write local files"),
        ServerDefinition::new(
            definition_id(WEB_SEARCH),
            "Web Search",
            EndpointKind::Sse,
            "0.4.1",
        )
        .expect("valid definition"),
    ];

    let instances = vec![
        instance(
            FS_LOCAL,
            FILESYSTEM,
            "npx -y @modelcontextprotocol/server-filesystem",
        )
        .with_arguments("/tmp")
        .with_status(InstanceStatus::Running),
        instance(
            FS_DOCS,
            FILESYSTEM,
            "npx -y @modelcontextprotocol/server-filesystem",
        )
        .with_arguments("/srv/docs"),
        instance(SEARCH_REMOTE, WEB_SEARCH, "https://search.example.com/sse")
            .with_env([("API_KEY".to_owned(), "test-key".to_owned())]),
    ];

    let profiles = vec![
        Profile::new(profile_id(DEV), "Development")
            .expect("valid profile")
            .with_instances([instance_id(FS_LOCAL)]),
        Profile::new(profile_id(RESEARCH), "Research").expect("valid profile"),
    ];

    let hosts = vec![
        Host::new(host_id(CLAUDE), "Claude Desktop", HostKind::ClaudeDesktop)
            .expect("valid host")
            .with_profile(profile_id(DEV))
            .with_status(HostStatus::Connected),
        Host::new(host_id(CURSOR), "Cursor", HostKind::Cursor).expect("valid host"),
    ];

    CatalogSnapshot {
        definitions,
        instances,
        profiles,
        hosts,
    }
}
