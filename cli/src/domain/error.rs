//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::phase::Phase;

pub use habprov_common::IdentError;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Errors raised while finalizing a run or executing its phases.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),

    #[error(
        "No results directory found under {root}. Build an artifact first or set provisioner.results_directory."
    )]
    ResultsDirectoryNotFound { root: String },

    #[error("No artifact matching '{pattern}' in {dir}")]
    ArtifactNotFound { dir: String, pattern: String },

    #[error(
        "Unsupported platform '{0}': only systemd-based Linux and Windows targets can be provisioned."
    )]
    UnsupportedPlatform(String),

    #[error("{phase} phase failed with exit code {code}:\n{stderr}")]
    PhaseFailed {
        phase: Phase,
        code: i32,
        stderr: String,
    },

    #[error(transparent)]
    Ident(#[from] IdentError),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}\n\nPass --config <path> or set HABPROV_CONFIG.")]
    NotFound(String),

    #[error("Invalid config file {path}: {message}")]
    Parse { path: String, message: String },
}
