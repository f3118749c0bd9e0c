//! Target operating system families.

use crate::domain::error::ProvisionError;

/// Platform name prefixes without systemd, rejected instead of guessed at.
const UNSUPPORTED_PREFIXES: &[&str] = &[
    "macos", "mac_os_x", "osx", "darwin", "freebsd", "openbsd", "solaris", "smartos", "aix",
];

/// The shell family a target speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux with `sh`, `sudo` and systemd.
    Posix,
    /// Windows with PowerShell.
    Windows,
}

impl Platform {
    /// Classify a platform name such as `ubuntu-22.04` or `windows-2019`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` for known non-systemd Unix families.
    pub fn from_name(name: &str) -> Result<Self, ProvisionError> {
        let lower = name.trim().to_ascii_lowercase();
        if lower.starts_with("windows") {
            return Ok(Platform::Windows);
        }
        if UNSUPPORTED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return Err(ProvisionError::UnsupportedPlatform(name.to_string()));
        }
        Ok(Platform::Posix)
    }

    /// Provisioning workspace on the target when `root_path` is unset.
    #[must_use]
    pub fn default_root_path(self) -> &'static str {
        match self {
            Platform::Posix => "/tmp/kitchen",
            Platform::Windows => r"C:\Windows\Temp\kitchen",
        }
    }

    #[must_use]
    pub fn separator(self) -> char {
        match self {
            Platform::Posix => '/',
            Platform::Windows => '\\',
        }
    }

    /// Join a target path and a relative segment with this platform's separator.
    #[must_use]
    pub fn join(self, base: &str, segment: &str) -> String {
        let sep = self.separator();
        let base = base.trim_end_matches(['/', '\\']);
        let segment = segment.trim_start_matches(['/', '\\']);
        format!("{base}{sep}{segment}")
    }
}
