//! Application service: the provisioning orchestrator.
//!
//! Phases run strictly in order and each one is awaited before the next
//! starts. There is no resumption state: a failed run is retried from the
//! beginning.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{ProgressReporter, SandboxWriter, ScriptTransport};
use crate::application::services::sandbox::create_sandbox;
use crate::domain::composer::compose_for;
use crate::domain::{Phase, ProvisionError, RunContext};

/// Compose `phase` and execute it on the target.
///
/// # Errors
///
/// Returns `PhaseFailed` when the script exits non-zero, or the transport
/// error when it cannot be run at all.
pub async fn run_phase(
    ctx: &RunContext,
    phase: Phase,
    transport: &impl ScriptTransport,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let script = compose_for(ctx, phase);
    info!(%phase, target = %transport.describe(), "running phase");
    reporter.step(&format!("{phase}: running on {}...", transport.describe()));

    let output = transport
        .run_script(&script)
        .await
        .with_context(|| format!("running {phase} phase"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        reporter.output(stdout.trim_end());
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ProvisionError::PhaseFailed {
            phase,
            code: output.status.code().unwrap_or(-1),
            stderr,
        }
        .into());
    }

    info!(%phase, "phase complete");
    reporter.success(&format!("{phase} complete"));
    Ok(())
}

/// Stage the sandbox locally and copy it into the target workspace.
///
/// # Errors
///
/// Returns an error if staging or the upload fails.
pub async fn upload_sandbox(
    ctx: &RunContext,
    transport: &impl ScriptTransport,
    sandbox: &impl SandboxWriter,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    create_sandbox(ctx, sandbox)?;
    if ctx.target.as_ref().is_some_and(|t| t.source.is_none()) {
        reporter.warn("artifact not found locally; it must already be on the target");
    }
    reporter.step(&format!("uploading sandbox to {}...", ctx.config.root_path));
    transport
        .upload(sandbox.path(), &ctx.config.root_path)
        .await
        .context("uploading sandbox")?;
    info!(root = %ctx.config.root_path, "sandbox uploaded");
    Ok(())
}

/// Run a single phase on its own. Prepare uploads the sandbox first, since
/// it reads the staged files.
///
/// # Errors
///
/// Returns an error if the upload or the phase fails.
pub async fn run_single(
    ctx: &RunContext,
    phase: Phase,
    transport: &impl ScriptTransport,
    sandbox: &impl SandboxWriter,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    if phase == Phase::Prepare {
        upload_sandbox(ctx, transport, sandbox, reporter).await?;
    }
    run_phase(ctx, phase, transport, reporter).await
}

/// Run every phase: install, init, sandbox upload, prepare, run.
///
/// # Errors
///
/// Stops at and returns the first failure.
pub async fn converge(
    ctx: &RunContext,
    transport: &impl ScriptTransport,
    sandbox: &impl SandboxWriter,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    run_phase(ctx, Phase::Install, transport, reporter).await?;
    run_phase(ctx, Phase::Init, transport, reporter).await?;
    upload_sandbox(ctx, transport, sandbox, reporter).await?;
    run_phase(ctx, Phase::Prepare, transport, reporter).await?;
    run_phase(ctx, Phase::Run, transport, reporter).await?;
    reporter.success(&format!("{} is running under the Supervisor", ctx.package));
    Ok(())
}
