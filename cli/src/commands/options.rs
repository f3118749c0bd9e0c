//! `habprov options`: show the flags passed to the Supervisor and the service.

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::domain::dialect::{Posix, PowerShell};
use crate::domain::Platform;
use crate::domain::options::{OptionSet, service_options, supervisor_options};

#[derive(Serialize)]
struct OptionsReport {
    supervisor: String,
    service: String,
}

fn render(options: &OptionSet, platform: Platform) -> String {
    match platform {
        Platform::Posix => options.render(&Posix),
        Platform::Windows => options.render(&PowerShell),
    }
}

/// Run the options command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or finalized.
pub fn run(app: &AppContext) -> Result<()> {
    let run = app.load_run()?;
    let ctx = &run.ctx;
    let report = OptionsReport {
        supervisor: render(&supervisor_options(&ctx.config, ctx.platform), ctx.platform),
        service: render(&service_options(&ctx.config), ctx.platform),
    };

    if app.is_json() {
        return crate::output::json::print(&report);
    }

    let out = &app.output;
    out.header(&format!("hab sup run ({})", ctx.supervisor));
    println!("    {}", report.supervisor);
    out.header(&format!("hab svc load ({})", ctx.load_ident()));
    println!("    {}", report.service);
    Ok(())
}
