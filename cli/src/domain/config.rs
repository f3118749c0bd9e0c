//! Domain types for habprov configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.
//! `ProvisionerInput` is the sparse user input; `ProvisionConfig::build`
//! applies defaults once and yields the immutable record every other
//! component reads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::platform::Platform;
use habprov_common::DEFAULT_SUPERVISOR;

// ── Constants ────────────────────────────────────────────────────────────────

/// Origin used when `package_origin` is not set at all.
pub const DEFAULT_PACKAGE_ORIGIN: &str = "core";
pub const DEFAULT_USER_TOML_NAME: &str = "user.toml";
pub const DEFAULT_SERVICE_LOAD_TIMEOUT: u64 = 300;
pub const DEFAULT_TRANSPORT_TIMEOUT: u64 = 1800;
pub const DEFAULT_SSH_PORT: u16 = 22;

// ── File schema ──────────────────────────────────────────────────────────────

/// Top-level configuration stored in `habprov.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionerFile {
    /// Suite name; also the default package name.
    pub suite: String,
    /// Target platform name, e.g. `ubuntu-22.04` or `windows-2019`.
    #[serde(default = "default_platform")]
    pub platform: String,
    /// How scripts reach the target.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Provisioner options.
    #[serde(default)]
    pub provisioner: ProvisionerInput,
}

fn default_platform() -> String {
    "linux".to_string()
}

/// Transport kind used to execute phase scripts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Run scripts on this machine.
    #[default]
    Local,
    /// Run scripts over `ssh`.
    Ssh,
}

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    #[serde(default)]
    pub identity_file: Option<PathBuf>,
    /// Upper bound in seconds for a single phase script.
    #[serde(default = "default_transport_timeout")]
    pub timeout: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Local,
            host: None,
            user: None,
            port: DEFAULT_SSH_PORT,
            identity_file: None,
            timeout: DEFAULT_TRANSPORT_TIMEOUT,
        }
    }
}

fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn default_transport_timeout() -> u64 {
    DEFAULT_TRANSPORT_TIMEOUT
}

/// Sparse provisioner options exactly as written by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionerInput {
    pub depot_url: Option<String>,
    pub hab_license: Option<String>,
    pub hab_version: Option<String>,
    pub hab_channel: Option<String>,

    pub hab_sup: Option<String>,
    pub hab_sup_origin: Option<String>,
    pub hab_sup_name: Option<String>,
    pub hab_sup_version: Option<String>,
    pub hab_sup_release: Option<String>,
    pub hab_sup_listen_ctl: Option<String>,
    pub hab_sup_listen_gossip: Option<String>,
    pub hab_sup_listen_http: Option<String>,
    pub hab_sup_peer: Vec<String>,
    pub hab_sup_bind: Vec<String>,
    pub hab_sup_group: Option<String>,
    pub hab_sup_ring: Option<String>,

    pub artifact_name: Option<String>,
    pub install_latest_artifact: bool,
    pub package_origin: Option<String>,
    pub package_name: Option<String>,
    pub package_version: Option<String>,
    pub package_release: Option<String>,

    pub service_topology: Option<String>,
    pub service_update_strategy: Option<String>,
    pub channel: Option<String>,

    pub results_directory: Option<PathBuf>,
    pub config_directory: Option<PathBuf>,
    pub user_toml_name: Option<String>,
    pub override_package_config: bool,
    pub service_load_timeout: Option<u64>,

    pub event_stream_application: Option<String>,
    pub event_stream_environment: Option<String>,
    pub event_stream_site: Option<String>,
    pub event_stream_url: Option<String>,
    pub event_stream_token: Option<String>,

    pub kitchen_root: Option<PathBuf>,
    pub root_path: Option<String>,
}

// ── Built config ─────────────────────────────────────────────────────────────

/// Immutable provisioner configuration with every default applied.
///
/// Empty strings in the input are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    pub depot_url: Option<String>,
    pub hab_license: Option<String>,
    pub hab_version: Option<String>,
    pub hab_channel: Option<String>,

    pub hab_sup: String,
    pub hab_sup_origin: Option<String>,
    pub hab_sup_name: Option<String>,
    pub hab_sup_version: Option<String>,
    pub hab_sup_release: Option<String>,
    pub hab_sup_listen_ctl: Option<String>,
    pub hab_sup_listen_gossip: Option<String>,
    pub hab_sup_listen_http: Option<String>,
    pub hab_sup_peer: Vec<String>,
    pub hab_sup_bind: Vec<String>,
    pub hab_sup_group: Option<String>,
    pub hab_sup_ring: Option<String>,

    pub artifact_name: Option<String>,
    pub install_latest_artifact: bool,
    pub package_origin: Option<String>,
    pub package_name: String,
    pub package_version: Option<String>,
    pub package_release: Option<String>,

    pub service_topology: Option<String>,
    pub service_update_strategy: Option<String>,
    pub channel: Option<String>,

    pub results_directory: Option<PathBuf>,
    pub config_directory: Option<PathBuf>,
    pub user_toml_name: String,
    pub override_package_config: bool,
    /// Seconds the Run phase waits for the Supervisor and the service.
    pub service_load_timeout: u64,

    pub event_stream_application: Option<String>,
    pub event_stream_environment: Option<String>,
    pub event_stream_site: Option<String>,
    pub event_stream_url: Option<String>,
    pub event_stream_token: Option<String>,

    /// Local project root probed for a results directory.
    pub kitchen_root: PathBuf,
    /// Provisioning workspace on the target.
    pub root_path: String,
}

impl ProvisionConfig {
    /// Apply defaults to the sparse input. The package name defaults to the
    /// suite name and `root_path` to the platform's workspace location.
    /// An absent `package_origin` becomes `core`; an explicitly empty one
    /// stays unset.
    #[must_use]
    pub fn build(input: ProvisionerInput, suite: &str, platform: Platform) -> Self {
        Self {
            depot_url: present(input.depot_url),
            hab_license: present(input.hab_license),
            hab_version: present(input.hab_version).filter(|v| v != "latest"),
            hab_channel: present(input.hab_channel),

            hab_sup: present(input.hab_sup).unwrap_or_else(|| DEFAULT_SUPERVISOR.to_string()),
            hab_sup_origin: present(input.hab_sup_origin),
            hab_sup_name: present(input.hab_sup_name),
            hab_sup_version: present(input.hab_sup_version),
            hab_sup_release: present(input.hab_sup_release),
            hab_sup_listen_ctl: present(input.hab_sup_listen_ctl),
            hab_sup_listen_gossip: present(input.hab_sup_listen_gossip),
            hab_sup_listen_http: present(input.hab_sup_listen_http),
            hab_sup_peer: input.hab_sup_peer,
            hab_sup_bind: input.hab_sup_bind,
            hab_sup_group: present(input.hab_sup_group),
            hab_sup_ring: present(input.hab_sup_ring),

            artifact_name: present(input.artifact_name),
            install_latest_artifact: input.install_latest_artifact,
            package_origin: match input.package_origin {
                None => Some(DEFAULT_PACKAGE_ORIGIN.to_string()),
                explicit => present(explicit),
            },
            package_name: present(input.package_name).unwrap_or_else(|| suite.to_string()),
            package_version: present(input.package_version),
            package_release: present(input.package_release),

            service_topology: present(input.service_topology),
            service_update_strategy: present(input.service_update_strategy),
            channel: present(input.channel),

            results_directory: input.results_directory,
            config_directory: input.config_directory,
            user_toml_name: present(input.user_toml_name)
                .unwrap_or_else(|| DEFAULT_USER_TOML_NAME.to_string()),
            override_package_config: input.override_package_config,
            service_load_timeout: input
                .service_load_timeout
                .unwrap_or(DEFAULT_SERVICE_LOAD_TIMEOUT),

            event_stream_application: present(input.event_stream_application),
            event_stream_environment: present(input.event_stream_environment),
            event_stream_site: present(input.event_stream_site),
            event_stream_url: present(input.event_stream_url),
            event_stream_token: present(input.event_stream_token),

            kitchen_root: input.kitchen_root.unwrap_or_else(|| PathBuf::from(".")),
            root_path: present(input.root_path)
                .unwrap_or_else(|| platform.default_root_path().to_string()),
        }
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self::build(ProvisionerInput::default(), "default", Platform::Posix)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
