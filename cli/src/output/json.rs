//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object to
//! stdout, including failures.

use anyhow::{Context, Result};
use serde::Serialize;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}

/// Stable machine-readable code for an error chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::{ConfigError, ProvisionError};

    if let Some(e) = err.downcast_ref::<ProvisionError>() {
        return match e {
            ProvisionError::MissingRequiredFields(_) => "missing_required_fields",
            ProvisionError::ResultsDirectoryNotFound { .. } => "results_directory_not_found",
            ProvisionError::ArtifactNotFound { .. } => "artifact_not_found",
            ProvisionError::UnsupportedPlatform(_) => "unsupported_platform",
            ProvisionError::PhaseFailed { .. } => "phase_failed",
            ProvisionError::Ident(_) => "invalid_identity",
        };
    }
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        return match e {
            ConfigError::NotFound(_) => "config_not_found",
            ConfigError::Parse { .. } => "config_invalid",
        };
    }
    if err.downcast_ref::<crate::domain::error::IdentError>().is_some() {
        return "invalid_identity";
    }
    "error"
}
