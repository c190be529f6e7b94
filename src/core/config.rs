//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/vaultview/config.toml` (or an explicit path),
//! then overridden by `VAULTVIEW_STORE` and finally by `--store`.
//!
//! ```toml
//! store = "~/secrets.toml"
//! status_ttl_secs = 5
//! confirm_discard = true
//! mask = "*****"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::store::File;
use crate::error::{ConfigError, Result};

/// Browser settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Secret-tree file to browse.
    pub store: Option<PathBuf>,
    /// How long a status notice stays visible.
    pub status_ttl_secs: u64,
    /// Require a second `back` before unsaved edits are dropped.
    pub confirm_discard: bool,
    /// Placeholder shown instead of unrevealed values.
    pub mask: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: None,
            status_ttl_secs: constants::STATUS_TTL_SECS,
            confirm_discard: true,
            mask: constants::MASK.to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE))
    }

    /// Load configuration and apply the environment override.
    ///
    /// An explicit path must exist; a missing default file just means
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for an
    /// unreadable or malformed file, and `ConfigError::InvalidValue` if the
    /// result fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };

        if let Some(store) = std::env::var_os(constants::STORE_ENV) {
            debug!(store = ?store, "store overridden from environment");
            config.store = Some(PathBuf::from(store));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Apply the command-line store path, which wins over everything else.
    pub fn with_store(mut self, store: Option<PathBuf>) -> Self {
        if store.is_some() {
            self.store = store;
        }
        self
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.status_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "status_ttl_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.mask.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "mask",
                reason: "must not be empty".into(),
            }
            .into());
        }
        if let Some(store) = &self.store {
            if store.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "store",
                    reason: "path is empty".into(),
                }
                .into());
            }
            if store.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "store",
                    reason: format!("'{}' is a directory", store.display()),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_secs)
    }

    /// Open the configured store file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoStore` when no store is configured, or the
    /// store's own error when the file can't be loaded.
    pub fn open_store(&self) -> Result<File> {
        let path = self.store.as_ref().ok_or(ConfigError::NoStore)?;
        File::open(path)
    }
}
