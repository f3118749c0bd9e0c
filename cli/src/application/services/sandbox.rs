//! Application service: staging local files for upload to the target.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::application::ports::SandboxWriter;
use crate::application::services::artifact::config_directory;
use crate::domain::RunContext;

/// Fill the sandbox with everything the later phases read from
/// `{root_path}` on the target.
///
/// The layout mirrors the target workspace: `results/{artifact}`,
/// `config/{user_toml_name}` and, when overriding package config, the
/// whole config directory under `config/`. The config directory is copied
/// before `user.toml` so the staged override always wins.
///
/// # Errors
///
/// Returns an error if any copy fails.
pub fn create_sandbox(ctx: &RunContext, sandbox: &impl SandboxWriter) -> Result<()> {
    let config = &ctx.config;

    match ctx.target.as_ref().and_then(|t| t.source.as_ref().map(|s| (t, s))) {
        Some((target, source)) => {
            debug!(artifact = %target.file_name, "staging artifact");
            sandbox
                .copy_file(source, &Path::new("results").join(&target.file_name))
                .with_context(|| format!("staging artifact {}", source.display()))?;
        }
        None if ctx.target.is_some() => {
            warn!("target artifact has no local copy; skipping artifact upload");
        }
        None => {}
    }

    if config.override_package_config
        && let Some(dir) = config_directory(config)
    {
        debug!(dir = %dir.display(), "staging package config directory");
        sandbox
            .copy_dir(&dir, Path::new("config"))
            .with_context(|| format!("staging config directory {}", dir.display()))?;
    }

    if let Some(user_toml) = &ctx.user_toml {
        debug!(path = %user_toml.display(), "staging user.toml");
        sandbox
            .copy_file(user_toml, &Path::new("config").join(&config.user_toml_name))
            .with_context(|| format!("staging {}", user_toml.display()))?;
    }

    Ok(())
}
