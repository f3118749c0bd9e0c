//! `habprov install|init|prepare|run`: execute one phase on the target.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::run_single;
use crate::domain::Phase;
use crate::infra::sandbox::TempSandbox;
use crate::output::TerminalReporter;

/// Run a single phase.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the transport fails,
/// or the phase script exits non-zero.
pub async fn run(app: &AppContext, phase: Phase) -> Result<()> {
    let loaded = app.load_run()?;
    let transport = loaded.transport()?;
    let sandbox = TempSandbox::new()?;
    let reporter = TerminalReporter::new(&app.output);

    run_single(&loaded.ctx, phase, &transport, &sandbox, &reporter).await?;

    if app.is_json() {
        crate::output::json::print(&serde_json::json!({
            "phase": phase.as_str(),
            "status": "ok",
        }))?;
    }
    Ok(())
}
