//! `habprov ident`: parse an artifact file name into its identity.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::domain::artifact::{artifact_target, parse_artifact_name};

#[derive(Args)]
pub struct IdentArgs {
    /// Artifact file name or path, e.g. `results/core-redis-7.2.4-20240301000000-x86_64-linux.hart`
    pub artifact: String,
}

#[derive(Serialize)]
struct IdentReport {
    origin: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    ident: String,
}

/// Run the ident command.
///
/// # Errors
///
/// Returns `MalformedArtifactName` when the name cannot be parsed.
pub fn run(app: &AppContext, args: &IdentArgs) -> Result<()> {
    let identity = parse_artifact_name(&args.artifact)?;
    let file_name = std::path::Path::new(&args.artifact)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&args.artifact);
    let report = IdentReport {
        ident: identity.ident(),
        target: artifact_target(file_name),
        origin: identity.origin,
        name: identity.name,
        version: identity.version,
        release: identity.release,
    };

    if app.is_json() {
        return crate::output::json::print(&report);
    }

    let out = &app.output;
    if out.quiet {
        println!("{}", report.ident);
        return Ok(());
    }
    out.kv("origin ", &report.origin);
    out.kv("name   ", &report.name);
    out.kv("version", report.version.as_deref().unwrap_or_default());
    out.kv("release", report.release.as_deref().unwrap_or_default());
    out.kv("target ", report.target.as_deref().unwrap_or_default());
    out.kv("ident  ", &report.ident);
    Ok(())
}
