//! Shell dialects: the OS-specific half of script composition.
//!
//! A `ShellDialect` knows how to quote values, join target paths, and lay
//! out each phase fragment for one shell family. The composer decides
//! *what* goes into a script; the dialect decides how it is spelled.

mod posix;
mod powershell;

pub use posix::Posix;
pub use powershell::{PowerShell, SINGLE_QUOTES};

use crate::domain::options::OptionSet;
use crate::domain::platform::Platform;

/// Version and channel pins for the `hab` installer.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallerPins<'a> {
    pub version: Option<&'a str>,
    pub channel: Option<&'a str>,
}

/// Everything needed to register the Supervisor as an OS service.
#[derive(Debug, Clone, Copy)]
pub struct SupervisorService<'a> {
    /// Supervisor package identity to install.
    pub ident: &'a str,
    /// Arguments for `hab sup run`.
    pub options: &'a OptionSet,
    /// Variables baked into the service definition.
    pub environment: &'a [(&'static str, String)],
}

/// Everything needed to load a package under the running Supervisor.
#[derive(Debug, Clone, Copy)]
pub struct ServiceLoad<'a> {
    /// Identity whose installed path is checked for a run hook.
    pub ident: &'a str,
    /// Identity handed to `hab svc load`.
    pub load_ident: &'a str,
    /// Arguments for `hab svc load`.
    pub options: &'a OptionSet,
    /// Seconds to wait for the service to report loaded.
    pub timeout_secs: u64,
}

/// Seconds between status polls in generated scripts.
pub const POLL_INTERVAL_SECS: u64 = 5;

/// One shell family's spelling of every phase fragment.
pub trait ShellDialect {
    fn platform(&self) -> Platform;

    /// Fail-fast header every script starts with.
    fn preamble(&self) -> &'static str;

    /// Quote `value` when it contains anything outside the dialect's safe set.
    fn quote(&self, value: &str) -> String;

    fn join_path(&self, base: &str, segment: &str) -> String {
        self.platform().join(base, segment)
    }

    /// Set an environment variable for the rest of the script.
    fn export_env(&self, key: &str, value: &str) -> String;

    /// Where a package reads its `user.toml` from.
    fn user_config_dir(&self, package_name: &str) -> String;

    /// Install the `hab` CLI unless it is already present.
    fn install_cli(&self, pins: InstallerPins<'_>) -> String;

    /// Ensure the `hab` user and group exist; `None` where not applicable.
    fn ensure_hab_user(&self) -> Option<String>;

    /// Recreate the provisioning workspace on the target.
    fn reset_workspace(&self, root: &str, create_config_dir: bool) -> String;

    /// Register the Supervisor as a service unless one already exists.
    fn ensure_supervisor_service(&self, service: SupervisorService<'_>) -> String;

    /// Replace the package's `user.toml` with the staged copy.
    fn stage_user_toml(&self, source: &str, dest_dir: &str) -> String;

    /// Poll `hab svc status [service]` until it succeeds or the timeout hits.
    fn wait_for_status(&self, service: Option<&str>, timeout_secs: u64) -> String;

    /// Install a package identity or artifact path.
    fn install_package(&self, target: &str, channel: &str) -> String;

    /// Load the package as a service if it ships a run hook, then wait for it.
    fn load_service(&self, load: ServiceLoad<'_>) -> String;
}

/// Render `options` as a suffix: empty, or a leading space plus the flags.
pub(crate) fn options_suffix(options: &OptionSet, dialect: &impl ShellDialect) -> String {
    if options.is_empty() {
        String::new()
    } else {
        format!(" {}", options.render(dialect))
    }
}

/// Characters that never need quoting in either dialect.
pub(crate) fn is_plain(value: &str, extra: &[char]) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '-' | '.' | '/' | ':' | '=' | '+')
                || extra.contains(&c)
        })
}

pub(crate) fn waiting_message(service: Option<&str>) -> String {
    match service {
        Some(s) => format!("Waiting {POLL_INTERVAL_SECS} seconds for {s} to load"),
        None => format!(
            "Waiting {POLL_INTERVAL_SECS} seconds for the Supervisor to finish loading"
        ),
    }
}

pub(crate) fn timeout_message(service: Option<&str>, timeout_secs: u64) -> String {
    match service {
        Some(s) => format!("{s} did not load within {timeout_secs} seconds."),
        None => format!("The Supervisor did not respond within {timeout_secs} seconds."),
    }
}

pub(crate) fn no_run_hook_message(ident: &str) -> String {
    format!("{ident} has no run hook; not loading it as a service.")
}
