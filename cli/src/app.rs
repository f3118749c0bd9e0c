//! State shared by every subcommand: output settings and where the
//! configuration comes from. Built once from the global flags.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::finalize::finalize;
use crate::domain::{RunContext, TransportConfig};
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::transport::Transport;
use crate::output::OutputContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    /// One JSON object on stdout, including for failures.
    Json,
}

/// Global flags relevant to building an [`AppContext`].
pub struct AppFlags {
    /// `--config`; falls back to `$HABPROV_CONFIG` then `./habprov.yml`.
    pub config: Option<PathBuf>,
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// Handed to each command handler.
pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    pub config_store: YamlConfigStore,
}

/// A finalized run plus the transport settings it executes over.
pub struct LoadedRun {
    pub ctx: RunContext,
    pub transport: TransportConfig,
}

impl LoadedRun {
    /// Build the configured transport for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport settings are incomplete.
    pub fn transport(&self) -> Result<Transport> {
        Transport::from_config(&self.transport, self.ctx.platform)
    }
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        // Progress lines would corrupt the single JSON object on stdout.
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config_store: YamlConfigStore::new(flags.config.clone()),
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Load the configuration file and finalize it into a `RunContext`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or any configuration
    /// check fails. Nothing has touched the target at this point.
    pub fn load_run(&self) -> Result<LoadedRun> {
        let file = self.config_store.load()?;
        let transport = file.transport.clone();
        let ctx = finalize(file, &LocalFs).with_context(|| {
            format!(
                "invalid configuration in {}",
                self.config_store.path().display()
            )
        })?;
        Ok(LoadedRun { ctx, transport })
    }
}
