//! Temporary local sandbox implementing the `SandboxWriter` port.

use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::application::ports::SandboxWriter;
use crate::infra::fs::{copy_dir_recursive, copy_file};

/// A sandbox directory that is deleted when dropped.
pub struct TempSandbox {
    dir: TempDir,
}

impl TempSandbox {
    /// Create an empty sandbox under the system temp directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("habprov-sandbox-")
            .tempdir()
            .context("creating sandbox directory")?;
        Ok(Self { dir })
    }
}

impl SandboxWriter for TempSandbox {
    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn copy_file(&self, source: &Path, relative: &Path) -> Result<()> {
        copy_file(source, &self.dir.path().join(relative))
    }

    fn copy_dir(&self, source: &Path, relative: &Path) -> Result<()> {
        copy_dir_recursive(source, &self.dir.path().join(relative))
    }
}
