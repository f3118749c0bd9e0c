//! `habprov converge`: run every phase in order.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ScriptTransport as _;
use crate::application::services::provision::converge;
use crate::infra::sandbox::TempSandbox;
use crate::output::TerminalReporter;

/// Run the converge command.
///
/// # Errors
///
/// Returns the first configuration, transport, or phase failure.
pub async fn run(app: &AppContext) -> Result<()> {
    let loaded = app.load_run()?;
    let transport = loaded.transport()?;
    let sandbox = TempSandbox::new()?;
    let ctx = &loaded.ctx;

    if !app.is_json() {
        app.output.header(&format!("Provisioning {}", ctx.package));
        if let Some(target) = &ctx.target {
            app.output.kv("artifact  ", &target.file_name);
        }
        app.output.kv("supervisor", &ctx.supervisor.ident());
        app.output.kv("target    ", &transport.describe());
    }

    let reporter = TerminalReporter::new(&app.output);
    converge(ctx, &transport, &sandbox, &reporter).await?;

    if app.is_json() {
        crate::output::json::print(&serde_json::json!({
            "status": "ok",
            "package": ctx.package,
            "supervisor": ctx.supervisor,
            "artifact": ctx.target.as_ref().map(|t| &t.file_name),
        }))?;
    }
    Ok(())
}
