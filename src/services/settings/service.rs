use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SLEEPS_CONFIG";

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "sleeps.db";

pub struct SettingsService {
    config_path: Option<PathBuf>,
    project_dirs: Option<ProjectDirs>,
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsService {
    /// Resolve the config file from `$SLEEPS_CONFIG`, falling back to the
    /// platform config directory.
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("com", "Bearhat", "Sleeps");
        let config_path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| {
                project_dirs
                    .as_ref()
                    .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            });
        Self {
            config_path,
            project_dirs,
        }
    }

    /// Read settings from an explicit file instead of the platform location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            project_dirs: ProjectDirs::from("com", "Bearhat", "Sleeps"),
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load settings. A missing file gives the defaults.
    pub fn load(&self) -> Result<Settings> {
        let Some(path) = self.config_path.as_deref() else {
            log::warn!("No config directory available, using default settings");
            return Ok(Settings::default());
        };

        if !path.exists() {
            log::info!("No config file at {}, using defaults", path.display());
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let settings: Settings = toml::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", path.display(), e))?;

        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings back, creating the parent directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;
        let path = self
            .config_path
            .as_deref()
            .ok_or_else(|| anyhow!("no config location available"))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }
        let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(path, data)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Database location: the configured path, else the platform data dir.
    pub fn database_path(&self, settings: &Settings) -> Result<PathBuf> {
        if let Some(path) = &settings.database_path {
            return Ok(path.clone());
        }

        match &self.project_dirs {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                fs::create_dir_all(data_dir).with_context(|| {
                    format!("failed to create data directory {}", data_dir.display())
                })?;
                Ok(data_dir.join(DATABASE_FILE))
            }
            None => Ok(PathBuf::from(DATABASE_FILE)),
        }
    }
}
