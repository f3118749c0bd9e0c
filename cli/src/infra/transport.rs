//! Script transports: implementations of the `ScriptTransport` port.
//!
//! Both transports pipe the composed script into a shell's stdin, so the
//! script never appears on a command line or in a temporary file.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{CommandRunner, ScriptTransport};
use crate::domain::{Platform, TransportConfig, TransportKind};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::copy_dir_recursive;

/// The shell command that reads a script from stdin on `platform`.
#[must_use]
pub fn shell_command(platform: Platform) -> (&'static str, &'static [&'static str]) {
    match platform {
        Platform::Posix => ("sh", &["-s"]),
        Platform::Windows => (
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", "-"],
        ),
    }
}

// ── Local ─────────────────────────────────────────────────────────────────────

/// Runs scripts on this machine.
pub struct LocalTransport<R: CommandRunner> {
    runner: R,
    platform: Platform,
}

impl<R: CommandRunner> LocalTransport<R> {
    pub fn new(runner: R, platform: Platform) -> Self {
        Self { runner, platform }
    }
}

impl<R: CommandRunner> ScriptTransport for LocalTransport<R> {
    async fn run_script(&self, script: &str) -> Result<Output> {
        let (program, args) = shell_command(self.platform);
        self.runner
            .run_with_stdin(program, args, script.as_bytes())
            .await
    }

    async fn upload(&self, sandbox: &Path, remote_root: &str) -> Result<()> {
        let src = sandbox.to_path_buf();
        let dst = PathBuf::from(remote_root);
        debug!(from = %src.display(), to = %dst.display(), "copying sandbox locally");
        tokio::task::spawn_blocking(move || copy_dir_recursive(&src, &dst))
            .await
            .context("spawn_blocking for sandbox copy")?
    }

    fn describe(&self) -> String {
        "localhost".to_string()
    }
}

// ── SSH ───────────────────────────────────────────────────────────────────────

/// Connection settings for `ssh` and `scp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub user: Option<String>,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
}

impl SshTarget {
    /// `user@host`, or just `host` when no user is configured.
    #[must_use]
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    /// Options shared by `ssh` and `scp`. The port flag differs between the
    /// two, so it is passed in.
    fn common_args(&self, port_flag: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            port_flag.to_string(),
            self.port.to_string(),
        ];
        if let Some(key) = &self.identity_file {
            args.push("-i".to_string());
            args.push(expand_home(key).display().to_string());
        }
        args
    }

    /// Arguments for `ssh` running `remote_command` on the target.
    #[must_use]
    pub fn ssh_args(&self, remote_command: &str) -> Vec<String> {
        let mut args = self.common_args("-p");
        args.push(self.destination());
        args.push(remote_command.to_string());
        args
    }

    /// Arguments for `scp -r` copying `sources` into `remote_dir`.
    #[must_use]
    pub fn scp_args(&self, sources: &[PathBuf], remote_dir: &str) -> Vec<String> {
        let mut args = vec!["-r".to_string()];
        args.extend(self.common_args("-P"));
        args.extend(sources.iter().map(|s| s.display().to_string()));
        args.push(format!("{}:{remote_dir}", self.destination()));
        args
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Runs scripts on a remote host over `ssh`.
pub struct SshTransport<R: CommandRunner> {
    runner: R,
    platform: Platform,
    target: SshTarget,
}

impl<R: CommandRunner> SshTransport<R> {
    pub fn new(runner: R, platform: Platform, target: SshTarget) -> Self {
        Self {
            runner,
            platform,
            target,
        }
    }
}

impl<R: CommandRunner> ScriptTransport for SshTransport<R> {
    async fn run_script(&self, script: &str) -> Result<Output> {
        let (program, shell_args) = shell_command(self.platform);
        let remote = std::iter::once(program)
            .chain(shell_args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let args = self.target.ssh_args(&remote);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner
            .run_with_stdin("ssh", &args, script.as_bytes())
            .await
    }

    async fn upload(&self, sandbox: &Path, remote_root: &str) -> Result<()> {
        let mut sources = Vec::new();
        for entry in std::fs::read_dir(sandbox)
            .with_context(|| format!("listing sandbox {}", sandbox.display()))?
        {
            sources.push(entry.context("reading sandbox entry")?.path());
        }
        if sources.is_empty() {
            debug!("sandbox is empty; nothing to upload");
            return Ok(());
        }
        sources.sort();

        let args = self.target.scp_args(&sources, remote_root);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.runner.run("scp", &args).await?;
        if !output.status.success() {
            anyhow::bail!(
                "scp to {} failed: {}",
                self.target.destination(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.target.destination()
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// The transport chosen by configuration.
pub enum Transport {
    Local(LocalTransport<TokioCommandRunner>),
    Ssh(SshTransport<TokioCommandRunner>),
}

impl Transport {
    /// Build the configured transport. The per-call timeout bounds each
    /// phase script and each upload.
    ///
    /// # Errors
    ///
    /// Returns an error when `kind: ssh` has no host.
    pub fn from_config(config: &TransportConfig, platform: Platform) -> Result<Self> {
        let runner = TokioCommandRunner::new(Duration::from_secs(config.timeout));
        match config.kind {
            TransportKind::Local => Ok(Self::Local(LocalTransport::new(runner, platform))),
            TransportKind::Ssh => {
                let host = config
                    .host
                    .clone()
                    .filter(|h| !h.trim().is_empty())
                    .context("transport.host is required when transport.kind is ssh")?;
                Ok(Self::Ssh(SshTransport::new(runner, platform, SshTarget {
                    host,
                    user: config.user.clone(),
                    port: config.port,
                    identity_file: config.identity_file.clone(),
                })))
            }
        }
    }
}

impl ScriptTransport for Transport {
    async fn run_script(&self, script: &str) -> Result<Output> {
        match self {
            Self::Local(t) => t.run_script(script).await,
            Self::Ssh(t) => t.run_script(script).await,
        }
    }

    async fn upload(&self, sandbox: &Path, remote_root: &str) -> Result<()> {
        match self {
            Self::Local(t) => t.upload(sandbox, remote_root).await,
            Self::Ssh(t) => t.upload(sandbox, remote_root).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Local(t) => t.describe(),
            Self::Ssh(t) => t.describe(),
        }
    }
}
