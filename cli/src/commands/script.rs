//! `habprov script <phase>`: print a composed phase script without running it.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::Phase;
use crate::domain::composer::compose_for;

#[derive(Args)]
pub struct ScriptArgs {
    /// Phase whose script to print
    #[arg(value_enum)]
    pub phase: Phase,
}

/// Run the script command. The script goes to stdout untouched so it can be
/// piped or saved.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or finalized.
pub fn run(app: &AppContext, args: &ScriptArgs) -> Result<()> {
    let run = app.load_run()?;
    let script = compose_for(&run.ctx, args.phase);

    if app.is_json() {
        return crate::output::json::print(&serde_json::json!({
            "phase": args.phase.as_str(),
            "platform": format!("{:?}", run.ctx.platform).to_lowercase(),
            "script": script,
        }));
    }
    print!("{script}");
    Ok(())
}
