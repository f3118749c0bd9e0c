//! Seams between the provisioning services and the outside world.
//!
//! Services are generic over these traits; `infra` supplies the real
//! implementations and the unit tests supply recording mocks.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::SystemTime;

use anyhow::Result;

use crate::domain::ProvisionerFile;

// ── Processes ─────────────────────────────────────────────────────────────────

/// Spawns local programs (`ssh`, `scp`, `sh`, `powershell`).
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` to completion under the runner's own timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Like [`CommandRunner::run`] with an explicit limit.
    ///
    /// # Errors
    ///
    /// Spawn failures and timeouts are errors; a timed-out child is killed.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run `program` feeding it `stdin`, then closing the pipe.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Target machine ────────────────────────────────────────────────────────────

/// Delivers phase scripts and sandbox files to the target machine.
#[allow(async_fn_in_trait)]
pub trait ScriptTransport {
    /// Execute `script` on the target and capture its output.
    ///
    /// A non-zero exit status is returned as `Ok`; the caller decides what
    /// it means.
    async fn run_script(&self, script: &str) -> Result<Output>;

    /// Copy every entry of the local `sandbox` directory into `remote_root`.
    async fn upload(&self, sandbox: &Path, remote_root: &str) -> Result<()>;

    /// Human-readable name of the target, used in progress messages.
    fn describe(&self) -> String;
}

// ── Local files ───────────────────────────────────────────────────────────────

/// A file found in a results directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl ArtifactFile {
    /// The file name component, or an empty string when there is none.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Read-only view of the local filesystem used during finalization.
pub trait LocalFs {
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    /// Regular files directly inside `dir`, with modification times.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be listed.
    fn list_files(&self, dir: &Path) -> Result<Vec<ArtifactFile>>;
}

/// The local provisioning workspace that is uploaded to the target.
pub trait SandboxWriter {
    /// Root of the sandbox.
    fn path(&self) -> &Path;
    /// Copy one file to `relative` inside the sandbox, creating parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    fn copy_file(&self, source: &Path, relative: &Path) -> Result<()>;
    /// Recursively copy a directory tree to `relative` inside the sandbox.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry cannot be copied.
    fn copy_dir(&self, source: &Path, relative: &Path) -> Result<()>;
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Source of the `habprov.yml` settings.
pub trait ConfigStore {
    /// Read and deserialize the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    fn load(&self) -> Result<ProvisionerFile>;
    /// The path `load` reads from.
    fn path(&self) -> PathBuf;
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Receives phase progress while the orchestrator runs.
pub trait ProgressReporter {
    /// A phase or upload is starting.
    fn step(&self, message: &str);
    /// The current step finished cleanly.
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
    /// Relay output captured from the target.
    fn output(&self, text: &str);
}
