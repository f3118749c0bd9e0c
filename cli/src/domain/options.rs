//! Supervisor and service option assembly.
//!
//! Both assemblers read the same `ProvisionConfig` fields but target
//! different commands: `hab sup run` takes manager-level flags, while
//! `hab svc load` only takes per-service flags. Flag order follows the
//! tables below, never the order of the source configuration.

use std::fmt;

use crate::domain::config::ProvisionConfig;
use crate::domain::dialect::ShellDialect;
use crate::domain::platform::Platform;

/// A single `--flag [value]` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOption {
    pub flag: &'static str,
    pub value: Option<String>,
}

/// Ordered command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<CliOption>,
}

impl OptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `flag value` when `value` is present and non-empty.
    pub fn push(&mut self, flag: &'static str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.options.push(CliOption {
                flag,
                value: Some(v.to_string()),
            });
        }
    }

    /// Push one `flag value` per element, in order.
    pub fn push_each(&mut self, flag: &'static str, values: &[String]) {
        for v in values {
            self.push(flag, Some(v));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CliOption> {
        self.options.iter()
    }

    /// Render with every value quoted for the target shell.
    #[must_use]
    pub fn render(&self, dialect: &impl ShellDialect) -> String {
        self.options
            .iter()
            .map(|o| match &o.value {
                Some(v) => format!("{} {}", o.flag, dialect.quote(v)),
                None => o.flag.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Values are interpolated verbatim; use [`OptionSet::render`] when the
/// result is placed into a shell script.
impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, o) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(o.flag)?;
            if let Some(v) = &o.value {
                write!(f, " {v}")?;
            }
        }
        Ok(())
    }
}

/// Directory passed to `--config-from`: always the workspace's `config/`.
#[must_use]
pub fn config_from_path(root_path: &str, platform: Platform) -> String {
    let mut path = platform.join(root_path, "config");
    path.push(platform.separator());
    path
}

/// Flags for `hab sup run`.
#[must_use]
pub fn supervisor_options(config: &ProvisionConfig, platform: Platform) -> OptionSet {
    let mut opts = OptionSet::new();
    opts.push("--listen-ctl", config.hab_sup_listen_ctl.as_deref());
    opts.push("--listen-gossip", config.hab_sup_listen_gossip.as_deref());
    opts.push("--listen-http", config.hab_sup_listen_http.as_deref());
    if config.override_package_config {
        let path = config_from_path(&config.root_path, platform);
        opts.push("--config-from", Some(&path));
    }
    opts.push_each("--bind", &config.hab_sup_bind);
    opts.push_each("--peer", &config.hab_sup_peer);
    opts.push("--group", config.hab_sup_group.as_deref());
    opts.push("--ring", config.hab_sup_ring.as_deref());
    opts.push("--topology", config.service_topology.as_deref());
    opts.push("--strategy", config.service_update_strategy.as_deref());
    opts.push("--channel", config.channel.as_deref());
    opts.push(
        "--event-stream-application",
        config.event_stream_application.as_deref(),
    );
    opts.push(
        "--event-stream-environment",
        config.event_stream_environment.as_deref(),
    );
    opts.push("--event-stream-site", config.event_stream_site.as_deref());
    opts.push("--event-stream-url", config.event_stream_url.as_deref());
    opts.push("--event-stream-token", config.event_stream_token.as_deref());
    opts
}

/// Flags for `hab svc load`.
#[must_use]
pub fn service_options(config: &ProvisionConfig) -> OptionSet {
    let mut opts = OptionSet::new();
    opts.push_each("--bind", &config.hab_sup_bind);
    opts.push("--group", config.hab_sup_group.as_deref());
    opts.push("--topology", config.service_topology.as_deref());
    opts.push("--strategy", config.service_update_strategy.as_deref());
    opts.push("--channel", config.channel.as_deref());
    opts
}
