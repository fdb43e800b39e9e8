//! Configuration for tasktrack.
//!
//! Loaded from `.tasktrack.yml` or `~/.config/tasktrack/tasktrack.yml`.

use eyre::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default users file name.
pub const DEFAULT_USERS_FILE: &str = "user.txt";

/// Default tasks file name.
pub const DEFAULT_TASKS_FILE: &str = "tasks.txt";

/// Password written for `admin` when the users file is first created.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the two flat files live.
    pub storage: StorageConfig,

    /// First-run seeding.
    pub bootstrap: BootstrapConfig,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .tasktrack.yml in current directory
    /// 3. ~/.config/tasktrack/tasktrack.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".tasktrack.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .tasktrack.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .tasktrack.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tasktrack").join("tasktrack.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.users_file.trim().is_empty() {
            eyre::bail!("storage.users-file must not be empty");
        }
        if self.storage.tasks_file.trim().is_empty() {
            eyre::bail!("storage.tasks-file must not be empty");
        }
        if self.storage.users_file == self.storage.tasks_file {
            eyre::bail!("storage.users-file and storage.tasks-file must differ");
        }
        if self.bootstrap.admin_password.is_empty() {
            eyre::bail!("bootstrap.admin-password must not be empty");
        }
        Ok(())
    }
}

/// Storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding both files.
    pub dir: PathBuf,

    #[serde(rename = "users-file")]
    pub users_file: String,

    #[serde(rename = "tasks-file")]
    pub tasks_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            users_file: DEFAULT_USERS_FILE.to_string(),
            tasks_file: DEFAULT_TASKS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    #[serde(rename = "admin-password")]
    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}
