//! The finalized, per-run record every phase reads from.
//!
//! Identities are derived here exactly once. Nothing downstream re-parses
//! the configuration, so the first derivation is the one every phase sees.

use std::path::PathBuf;

use habprov_common::{PackageIdentity, SupervisorIdentity};

use crate::domain::artifact::parse_artifact_name;
use crate::domain::config::ProvisionConfig;
use crate::domain::error::ProvisionError;
use crate::domain::platform::Platform;

/// The workload artifact chosen for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetArtifact {
    /// Artifact file name, e.g. `core-redis-7.2.4-20240301000000-x86_64-linux.hart`.
    pub file_name: String,
    /// Local copy to stage into the sandbox, when a results directory exists.
    pub source: Option<PathBuf>,
    /// Where the artifact lands on the target.
    pub install_path: String,
    /// Identity handed to `hab svc load`: `origin/name` only.
    pub load_ident: String,
    /// Identity parsed from `file_name`.
    pub identity: PackageIdentity,
}

impl TargetArtifact {
    /// Build the target for `file_name`, staged under `{root_path}/results`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedArtifactName` when `file_name` cannot be parsed.
    pub fn new(
        file_name: &str,
        source: Option<PathBuf>,
        root_path: &str,
        platform: Platform,
    ) -> Result<Self, ProvisionError> {
        let identity = parse_artifact_name(file_name)?;
        Ok(Self::with_identity(file_name, identity, source, root_path, platform))
    }

    /// Like [`TargetArtifact::new`] when the identity is already known,
    /// e.g. for an origin the file name alone cannot delimit.
    #[must_use]
    pub fn with_identity(
        file_name: &str,
        identity: PackageIdentity,
        source: Option<PathBuf>,
        root_path: &str,
        platform: Platform,
    ) -> Self {
        let results = platform.join(root_path, "results");
        Self {
            file_name: file_name.to_string(),
            source,
            install_path: platform.join(&results, file_name),
            load_ident: identity.short_ident(),
            identity,
        }
    }
}

/// Everything a provisioning run needs, computed once by `finalize`.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: ProvisionConfig,
    pub platform: Platform,
    pub package: PackageIdentity,
    pub supervisor: SupervisorIdentity,
    pub target: Option<TargetArtifact>,
    /// Local `user.toml` override, when one was found.
    pub user_toml: Option<PathBuf>,
    /// Local results directory, when one was found.
    pub results_dir: Option<PathBuf>,
}

impl RunContext {
    /// Identity installed in the Run phase: the artifact path when there is
    /// one, otherwise the package identity.
    #[must_use]
    pub fn install_target(&self) -> String {
        self.target
            .as_ref()
            .map_or_else(|| self.package.ident(), |t| t.install_path.clone())
    }

    /// Identity handed to `hab svc load`.
    #[must_use]
    pub fn load_ident(&self) -> String {
        self.target
            .as_ref()
            .map_or_else(|| self.package.ident(), |t| t.load_ident.clone())
    }

    /// Identity whose installed path is checked for a run hook.
    #[must_use]
    pub fn installed_ident(&self) -> String {
        match &self.target {
            Some(t) => t.identity.ident(),
            None => self.package.ident(),
        }
    }
}

/// The workload identity as declared in configuration, before any artifact
/// is consulted.
///
/// A `package_name` containing `/` is read as the full shorthand and wins
/// over the separate fields. Otherwise the identity needs `package_origin`;
/// `Ok(None)` means the origin is still unknown.
///
/// # Errors
///
/// Returns `InvalidShorthand` when `package_name` contains `/` but is not a
/// valid shorthand.
pub fn declared_package(config: &ProvisionConfig) -> Result<Option<PackageIdentity>, ProvisionError> {
    if config.package_name.contains('/') {
        return Ok(Some(config.package_name.parse()?));
    }
    Ok(config.package_origin.as_ref().map(|origin| {
        PackageIdentity::new(origin.as_str(), config.package_name.as_str())
            .with_version(config.package_version.clone())
            .with_release(config.package_release.clone())
    }))
}

/// The Supervisor identity: the `hab_sup` shorthand with any explicit
/// `hab_sup_*` field layered on top.
///
/// # Errors
///
/// Returns `InvalidShorthand` when `hab_sup` is not a valid shorthand.
pub fn supervisor_identity(config: &ProvisionConfig) -> Result<SupervisorIdentity, ProvisionError> {
    let mut ident: SupervisorIdentity = config.hab_sup.parse()?;
    if let Some(origin) = &config.hab_sup_origin {
        ident.origin.clone_from(origin);
    }
    if let Some(name) = &config.hab_sup_name {
        ident.name.clone_from(name);
    }
    if config.hab_sup_version.is_some() {
        ident = ident.with_version(config.hab_sup_version.clone());
    }
    if config.hab_sup_release.is_some() {
        ident = ident.with_release(config.hab_sup_release.clone());
    }
    Ok(ident)
}
