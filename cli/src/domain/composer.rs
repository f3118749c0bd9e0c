//! Phase script composition.
//!
//! `CommandComposer` decides what each phase does; the `ShellDialect` it is
//! generic over decides how that is spelled on the target. Composing never
//! fails: every input was validated when the `RunContext` was finalized.

use crate::domain::context::RunContext;
use crate::domain::dialect::{
    InstallerPins, Posix, PowerShell, ServiceLoad, ShellDialect, SupervisorService,
};
use crate::domain::options::{service_options, supervisor_options};
use crate::domain::phase::Phase;
use crate::domain::platform::Platform;

/// Channel used for package installs when none is configured.
pub const DEFAULT_CHANNEL: &str = "stable";

pub const ENV_DEPOT_URL: &str = "HAB_BLDR_URL";
pub const ENV_LICENSE: &str = "HAB_LICENSE";

/// Builds the four phase scripts for one run.
pub struct CommandComposer<'a, D: ShellDialect> {
    ctx: &'a RunContext,
    dialect: D,
}

impl<'a, D: ShellDialect> CommandComposer<'a, D> {
    #[must_use]
    pub fn new(ctx: &'a RunContext, dialect: D) -> Self {
        Self { ctx, dialect }
    }

    #[must_use]
    pub fn compose(&self, phase: Phase) -> String {
        match phase {
            Phase::Install => self.install(),
            Phase::Init => self.init(),
            Phase::Prepare => self.prepare(),
            Phase::Run => self.run(),
        }
    }

    /// Install the `hab` CLI unless it is already on the target.
    #[must_use]
    pub fn install(&self) -> String {
        let config = &self.ctx.config;
        let mut parts = self.exports();
        parts.push(self.dialect.install_cli(InstallerPins {
            version: config.hab_version.as_deref(),
            channel: config.hab_channel.as_deref(),
        }));
        self.script(parts)
    }

    /// Create the hab user, reset the workspace and register the Supervisor.
    #[must_use]
    pub fn init(&self) -> String {
        let config = &self.ctx.config;
        let mut parts = self.exports();
        parts.extend(self.dialect.ensure_hab_user());
        parts.push(
            self.dialect
                .reset_workspace(&config.root_path, !config.override_package_config),
        );
        let options = supervisor_options(config, self.ctx.platform);
        let environment = self.environment();
        parts.push(self.dialect.ensure_supervisor_service(SupervisorService {
            ident: &self.ctx.supervisor.ident(),
            options: &options,
            environment: &environment,
        }));
        self.script(parts)
    }

    /// Stage the `user.toml` override. Preamble only when there is none.
    #[must_use]
    pub fn prepare(&self) -> String {
        let mut parts = Vec::new();
        if self.ctx.user_toml.is_some() {
            let config = &self.ctx.config;
            let config_dir = self.dialect.join_path(&config.root_path, "config");
            let source = self.dialect.join_path(&config_dir, &config.user_toml_name);
            let dest = self.dialect.user_config_dir(&self.ctx.package.name);
            parts.push(self.dialect.stage_user_toml(&source, &dest));
        }
        self.script(parts)
    }

    /// Wait for the Supervisor, install the package and load it.
    #[must_use]
    pub fn run(&self) -> String {
        let config = &self.ctx.config;
        let timeout = config.service_load_timeout;
        let channel = config.channel.as_deref().unwrap_or(DEFAULT_CHANNEL);
        let options = service_options(config);

        let mut parts = self.exports();
        parts.push(self.dialect.wait_for_status(None, timeout));
        parts.push(
            self.dialect
                .install_package(&self.ctx.install_target(), channel),
        );
        parts.push(self.dialect.load_service(ServiceLoad {
            ident: &self.ctx.installed_ident(),
            load_ident: &self.ctx.load_ident(),
            options: &options,
            timeout_secs: timeout,
        }));
        self.script(parts)
    }

    fn environment(&self) -> Vec<(&'static str, String)> {
        let config = &self.ctx.config;
        [
            (ENV_DEPOT_URL, config.depot_url.as_ref()),
            (ENV_LICENSE, config.hab_license.as_ref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v.clone())))
        .collect()
    }

    fn exports(&self) -> Vec<String> {
        self.environment()
            .iter()
            .map(|(key, value)| self.dialect.export_env(key, value))
            .collect()
    }

    fn script(&self, parts: Vec<String>) -> String {
        let mut out = String::from(self.dialect.preamble());
        out.push('\n');
        for part in parts {
            out.push_str(&part);
            out.push('\n');
        }
        out
    }
}

/// Compose `phase` with the dialect matching the context's platform.
#[must_use]
pub fn compose_for(ctx: &RunContext, phase: Phase) -> String {
    match ctx.platform {
        Platform::Posix => CommandComposer::new(ctx, Posix).compose(phase),
        Platform::Windows => CommandComposer::new(ctx, PowerShell).compose(phase),
    }
}
