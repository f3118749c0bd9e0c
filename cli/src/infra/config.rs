//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::{ConfigError, ProvisionerFile};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "HABPROV_CONFIG";

/// File read from the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "habprov.yml";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    /// `explicit` is the `--config` flag, which wins over everything else.
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ProvisionerFile> {
        let path = self.path();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn path(&self) -> PathBuf {
        if let Some(path) = &self.explicit {
            return path.clone();
        }
        if let Ok(val) = std::env::var(CONFIG_ENV)
            && !val.is_empty()
        {
            return PathBuf::from(val);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
