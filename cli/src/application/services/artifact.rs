//! Application service: locating the workload artifact on the local disk.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All filesystem access goes through the `LocalFs` port.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::application::ports::LocalFs;
use crate::domain::artifact::{artifact_identity_of, artifact_pattern};
use crate::domain::error::IdentError;
use crate::domain::context::{TargetArtifact, declared_package};
use crate::domain::{Platform, ProvisionConfig, ProvisionError};

/// Results directories probed under the project root, nearest first.
const RESULTS_CANDIDATES: [&str; 3] = ["results", "../results", "../../results"];

/// Find the local directory that holds built artifacts.
///
/// An explicit `results_directory` is returned verbatim without checking
/// that it exists. Otherwise the first existing directory among
/// `{root}/results`, `{root}/../results` and `{root}/../../results` wins.
pub fn resolve_results_directory(config: &ProvisionConfig, fs: &impl LocalFs) -> Option<PathBuf> {
    if let Some(dir) = &config.results_directory {
        debug!(dir = %dir.display(), "using configured results directory");
        return Some(dir.clone());
    }
    let found = RESULTS_CANDIDATES
        .iter()
        .map(|candidate| config.kitchen_root.join(candidate))
        .find(|path| fs.is_dir(path));
    match &found {
        Some(dir) => debug!(dir = %dir.display(), "found results directory"),
        None => debug!(
            root = %config.kitchen_root.display(),
            "no results directory found; artifact copy will be skipped"
        ),
    }
    found
}

/// File name of the newest `{origin}-{name}-*.hart` in `dir`.
///
/// The rest of the file name after `{origin}-{name}-` must be a version,
/// release and target, so `core-redis-` never picks up
/// `core-redis-sentinel-...` and hyphenated origins such as `my-org` match.
///
/// # Errors
///
/// Returns `MissingRequiredFields` when `origin` or `name` is empty,
/// `ArtifactNotFound` when nothing matches, or an I/O error if `dir`
/// cannot be listed.
pub fn latest_artifact(dir: &Path, origin: &str, name: &str, fs: &impl LocalFs) -> Result<String> {
    let mut missing = Vec::new();
    if origin.is_empty() {
        missing.push("package_origin");
    }
    if name.is_empty() {
        missing.push("package_name");
    }
    if !missing.is_empty() {
        return Err(ProvisionError::MissingRequiredFields(missing).into());
    }

    let latest = fs
        .list_files(dir)?
        .into_iter()
        .filter(|file| artifact_identity_of(file.file_name(), origin, name).is_some())
        .max_by_key(|file| file.modified)
        .ok_or_else(|| ProvisionError::ArtifactNotFound {
            dir: dir.display().to_string(),
            pattern: artifact_pattern(origin, name),
        })?;

    debug!(artifact = latest.file_name(), "selected latest artifact");
    Ok(latest.file_name().to_string())
}

/// Decide which artifact, if any, the Run phase installs.
///
/// In latest mode the results directory is required and the newest
/// matching artifact is chosen. Otherwise an explicit `artifact_name` is
/// used as given. Without either, the package is installed by identity
/// and `Ok(None)` is returned.
///
/// # Errors
///
/// Returns `ResultsDirectoryNotFound` or any `latest_artifact` error in
/// latest mode, and `MalformedArtifactName` when the chosen file name
/// cannot be parsed.
pub fn get_target_artifact(
    config: &ProvisionConfig,
    platform: Platform,
    results_dir: Option<&Path>,
    fs: &impl LocalFs,
) -> Result<Option<TargetArtifact>> {
    let (file_name, known) = if config.install_latest_artifact {
        let dir = results_dir.ok_or_else(|| ProvisionError::ResultsDirectoryNotFound {
            root: config.kitchen_root.display().to_string(),
        })?;
        let declared = declared_package(config)?;
        let (origin, name) = match &declared {
            Some(id) => (id.origin.as_str(), id.name.as_str()),
            None => ("", config.package_name.as_str()),
        };
        let file_name = latest_artifact(dir, origin, name, fs)?;
        let identity = artifact_identity_of(&file_name, origin, name).ok_or_else(|| {
            ProvisionError::Ident(IdentError::MalformedArtifactName(file_name.clone()))
        })?;
        (file_name, Some(identity))
    } else if let Some(name) = &config.artifact_name {
        (name.clone(), None)
    } else {
        debug!("no artifact configured; installing by package identity");
        return Ok(None);
    };

    let source = results_dir
        .map(|dir| dir.join(&file_name))
        .filter(|path| fs.is_file(path));
    if source.is_none() {
        debug!(artifact = %file_name, "artifact not present locally; it will not be uploaded");
    }
    let target = match known {
        Some(identity) => {
            TargetArtifact::with_identity(&file_name, identity, source, &config.root_path, platform)
        }
        None => TargetArtifact::new(&file_name, source, &config.root_path, platform)?,
    };
    Ok(Some(target))
}

/// The local `user.toml` override: `{config_directory}/{user_toml_name}`
/// when that file exists. Relative directories are taken from the project
/// root.
pub fn find_user_toml(config: &ProvisionConfig, fs: &impl LocalFs) -> Option<PathBuf> {
    let dir = config_directory(config)?;
    let path = dir.join(&config.user_toml_name);
    if fs.is_file(&path) {
        debug!(path = %path.display(), "found user.toml override");
        Some(path)
    } else {
        debug!(path = %path.display(), "no user.toml override");
        None
    }
}

/// `config_directory` resolved against the project root.
pub fn config_directory(config: &ProvisionConfig) -> Option<PathBuf> {
    config.config_directory.as_ref().map(|dir| {
        if dir.is_absolute() {
            dir.clone()
        } else {
            config.kitchen_root.join(dir)
        }
    })
}
