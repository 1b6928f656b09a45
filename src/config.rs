//! Configuration for the logger

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for exception trace files (created on demand)
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Title of the log window
    #[serde(default = "default_window_title")]
    pub window_title: String,

    /// Maximum lines kept in the log panel buffer
    #[serde(default = "default_max_panel_runs")]
    pub max_panel_runs: usize,

    /// Tick interval of the log window event loop in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_window_title() -> String {
    "Log Window".to_string()
}

fn default_max_panel_runs() -> usize {
    10_000
}

fn default_tick_rate_ms() -> u64 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
            window_title: default_window_title(),
            max_panel_runs: default_max_panel_runs(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// The logs directory resolved against the current working directory
    ///
    /// Falls back to the configured path as-is if the working directory
    /// cannot be determined.
    pub fn absolute_logs_dir(&self) -> PathBuf {
        if self.logs_dir.is_absolute() {
            self.logs_dir.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.logs_dir))
                .unwrap_or_else(|_| self.logs_dir.clone())
        }
    }
}
