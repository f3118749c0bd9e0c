use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supervisor package installed when nothing else is configured.
pub const DEFAULT_SUPERVISOR: &str = "core/hab-sup";

/// Errors produced while deriving a package identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentError {
    #[error(
        "Malformed artifact name '{0}': expected <origin>-<name>-<version>-<release>-<target>.hart"
    )]
    MalformedArtifactName(String),

    #[error("Invalid package identifier '{0}': expected origin/name[/version[/release]]")]
    InvalidShorthand(String),
}

/// The four-part `origin/name/version/release` key of a package build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub origin: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
}

/// The Supervisor package is identified exactly like a workload package.
pub type SupervisorIdentity = PackageIdentity;

impl PackageIdentity {
    /// Identity with only origin and name; the package manager picks the version.
    #[must_use]
    pub fn new(origin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            name: name.into(),
            version: None,
            release: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version.filter(|v| !v.is_empty());
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: Option<String>) -> Self {
        self.release = release.filter(|r| !r.is_empty());
        self
    }

    /// Canonical identifier consumed by `hab`, trailing empty segments trimmed.
    #[must_use]
    pub fn ident(&self) -> String {
        assemble_identity(
            &self.origin,
            &self.name,
            self.version.as_deref(),
            self.release.as_deref(),
        )
    }

    /// `origin/name` only. Used when loading a service so the Supervisor
    /// resolves whichever release is installed.
    #[must_use]
    pub fn short_ident(&self) -> String {
        format!("{}/{}", self.origin, self.name)
    }

    /// `origin-name`, the prefix every artifact of this package starts with.
    #[must_use]
    pub fn artifact_prefix(&self) -> String {
        format!("{}-{}-", self.origin, self.name)
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ident())
    }
}

impl FromStr for PackageIdentity {
    type Err = IdentError;

    /// Parse the `origin/name[/version[/release]]` shorthand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        let invalid = || IdentError::InvalidShorthand(s.to_string());
        match parts.as_slice() {
            [origin, name, rest @ ..] if !origin.is_empty() && !name.is_empty() => {
                if rest.len() > 2 {
                    return Err(invalid());
                }
                let version = rest.first().map(ToString::to_string);
                let release = rest.get(1).map(ToString::to_string);
                Ok(Self::new(*origin, *name)
                    .with_version(version)
                    .with_release(release))
            }
            _ => Err(invalid()),
        }
    }
}

/// Join identity segments with `/`, dropping trailing empty segments.
#[must_use]
pub fn assemble_identity(
    origin: &str,
    name: &str,
    version: Option<&str>,
    release: Option<&str>,
) -> String {
    let segments = [
        origin,
        name,
        version.unwrap_or_default(),
        release.unwrap_or_default(),
    ];
    let used = segments
        .iter()
        .rposition(|s| !s.is_empty())
        .map_or(0, |i| i + 1);
    segments[..used].join("/")
}
