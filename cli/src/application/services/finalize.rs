//! Application service: turning a loaded configuration file into a `RunContext`.
//!
//! Every configuration error surfaces here, before anything touches the
//! target.

use anyhow::Result;
use tracing::{debug, info};

use crate::application::ports::LocalFs;
use crate::application::services::artifact::{
    find_user_toml, get_target_artifact, resolve_results_directory,
};
use crate::domain::context::{declared_package, supervisor_identity};
use crate::domain::{Platform, ProvisionConfig, ProvisionError, ProvisionerFile, RunContext};

/// Build the immutable context for one run.
///
/// The package identity comes from the chosen artifact when there is one,
/// otherwise from the declared configuration.
///
/// # Errors
///
/// Returns `UnsupportedPlatform`, `MissingRequiredFields`, identity parse
/// errors, or any artifact resolution error.
pub fn finalize(file: ProvisionerFile, fs: &impl LocalFs) -> Result<RunContext> {
    let platform = Platform::from_name(&file.platform)?;
    let config = ProvisionConfig::build(file.provisioner, &file.suite, platform);

    let supervisor = supervisor_identity(&config)?;
    let results_dir = resolve_results_directory(&config, fs);
    let target = get_target_artifact(&config, platform, results_dir.as_deref(), fs)?;

    let package = match &target {
        Some(t) => t.identity.clone(),
        None => declared_package(&config)?
            .ok_or_else(|| ProvisionError::MissingRequiredFields(vec!["package_origin"]))?,
    };
    let user_toml = find_user_toml(&config, fs);

    info!(
        suite = %file.suite,
        platform = ?platform,
        package = %package,
        supervisor = %supervisor,
        "finalized run context"
    );
    if let Some(t) = &target {
        debug!(artifact = %t.file_name, install_path = %t.install_path, "target artifact");
    }

    Ok(RunContext {
        config,
        platform,
        package,
        supervisor,
        target,
        user_toml,
        results_dir,
    })
}
