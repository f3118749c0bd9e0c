//! Fake process results and run contexts for the unit harness.

#![allow(dead_code, clippy::expect_used)]

use std::path::Path;
use std::process::{ExitStatus, Output};

use habprov_cli::application::services::finalize::finalize;
use habprov_cli::domain::{ProvisionerFile, RunContext};
use habprov_cli::infra::fs::LocalFs;

// ── Exit statuses ────────────────────────────────────────────────────────────

/// `ExitStatus` for a process that exited with `code`. Unix keeps the code
/// in the high byte of the raw wait status.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Captured output ──────────────────────────────────────────────────────────

/// A clean exit printing `stdout`.
pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

/// A failed phase: exit `code` with `stderr`.
pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Run contexts ─────────────────────────────────────────────────────────────

/// Parse a YAML config with `kitchen_root` pinned to `root`, so results
/// directory probing never escapes the test's temp dir.
pub fn file_in(root: &Path, yaml: &str) -> ProvisionerFile {
    let mut file: ProvisionerFile = serde_yaml::from_str(yaml).expect("test config parses");
    if file.provisioner.kitchen_root.is_none() {
        file.provisioner.kitchen_root = Some(root.to_path_buf());
    }
    file
}

/// Finalize a YAML config against the real filesystem under `root`.
pub fn context_in(root: &Path, yaml: &str) -> RunContext {
    finalize(file_in(root, yaml), &LocalFs).expect("test config finalizes")
}
