//! `habprov version`

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;

#[derive(Serialize)]
struct VersionReport {
    version: &'static str,
}

/// Print the CLI version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let report = VersionReport {
        version: env!("CARGO_PKG_VERSION"),
    };
    if app.is_json() {
        return crate::output::json::print(&report);
    }
    println!("habprov {}", report.version);
    Ok(())
}
