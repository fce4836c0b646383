// Settings module
// Application configuration read from config.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the rollover pass does with a repeating countdown that lapsed by more
/// than one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RolloverPolicy {
    /// Advance once per pass; later passes catch up the rest.
    #[default]
    SingleStep,
    /// Keep advancing until the date is today or later.
    CatchUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file; `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Insert the default anniversaries on first launch.
    pub seed_defaults: bool,
    pub rollover_policy: RolloverPolicy,
    /// Seconds past midnight at which the daily refresh fires.
    pub refresh_grace_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_defaults: true,
            rollover_policy: RolloverPolicy::SingleStep,
            refresh_grace_secs: 1,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_grace_secs > 3600 {
            return Err(format!(
                "refresh_grace_secs must be at most 3600, got {}",
                self.refresh_grace_secs
            ));
        }
        if let Some(path) = &self.database_path {
            if path.as_os_str().is_empty() {
                return Err("database_path must not be empty".to_string());
            }
        }
        Ok(())
    }

    pub fn refresh_grace(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_grace_secs)
    }
}
