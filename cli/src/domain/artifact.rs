//! Habitat artifact file names: pure parsing, no I/O.
//!
//! An artifact is named `<origin>-<name>-<version>-<release>-<target>.hart`.
//! The name segment may itself contain hyphens; the stricter version and
//! release patterns decide where it ends.

use std::path::Path;
use std::sync::LazyLock;

use habprov_common::{IdentError, PackageIdentity};
use regex::Regex;

/// File extension of a Habitat artifact.
pub const ARTIFACT_EXTENSION: &str = ".hart";

static ARTIFACT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern and cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(
        r"^(?P<origin>\w+)-(?P<name>.*)-(?P<version>(?:\d+)?(?:\.\d+)?(?:\.\d+)?(?:\.\d+)?)-(?P<release>\d+)-(?P<target>.*)\.hart$",
    )
    .expect("valid regex")
});

/// Parse an artifact file name into its package identity.
///
/// Leading directories are ignored. An empty version segment yields
/// `version: None`.
///
/// # Errors
///
/// Returns `MalformedArtifactName` when the name does not follow the
/// artifact naming scheme.
pub fn parse_artifact_name(filename: &str) -> Result<PackageIdentity, IdentError> {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let caps = ARTIFACT_NAME_RE
        .captures(base)
        .ok_or_else(|| IdentError::MalformedArtifactName(filename.to_string()))?;

    let origin = &caps["origin"];
    let name = &caps["name"];
    if name.is_empty() {
        return Err(IdentError::MalformedArtifactName(filename.to_string()));
    }

    Ok(PackageIdentity::new(origin, name)
        .with_version(Some(caps["version"].to_string()))
        .with_release(Some(caps["release"].to_string())))
}

/// Target triple segment of an artifact name, e.g. `x86_64-linux`.
#[must_use]
pub fn artifact_target(filename: &str) -> Option<String> {
    ARTIFACT_NAME_RE
        .captures(filename)
        .map(|caps| caps["target"].to_string())
}

/// Whether `filename` matches the `{origin}-{name}-*.hart` pattern.
#[must_use]
pub fn matches_artifact_pattern(filename: &str, origin: &str, name: &str) -> bool {
    filename.starts_with(&format!("{origin}-{name}-")) && filename.ends_with(ARTIFACT_EXTENSION)
}

/// Identity of `filename` when it is an artifact of exactly `origin/name`.
///
/// The prefix is matched literally, so origins containing hyphens work.
/// The remainder must be a version, release and target; `core-redis`
/// therefore rejects `core-redis-sentinel-1.0.0-...`.
#[must_use]
pub fn artifact_identity_of(filename: &str, origin: &str, name: &str) -> Option<PackageIdentity> {
    if !matches_artifact_pattern(filename, origin, name) {
        return None;
    }
    let rest = filename.strip_prefix(&format!("{origin}-{name}-"))?;
    let synthetic = format!("o-n-{rest}");
    let caps = ARTIFACT_NAME_RE.captures(&synthetic)?;
    if &caps["name"] != "n" {
        return None;
    }
    Some(
        PackageIdentity::new(origin, name)
            .with_version(Some(caps["version"].to_string()))
            .with_release(Some(caps["release"].to_string())),
    )
}

/// Human-readable form of the pattern used in error messages.
#[must_use]
pub fn artifact_pattern(origin: &str, name: &str) -> String {
    format!("{origin}-{name}-*{ARTIFACT_EXTENSION}")
}
