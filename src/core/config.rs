use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default refresh period between rounds, in milliseconds.
pub const DEFAULT_REFRESH_MS: u64 = 1000;

/// Refresh periods below this are rejected; CPU sampling needs the window.
pub const MIN_REFRESH_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Optional per-round deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_ms: DEFAULT_REFRESH_MS,
            timeout_ms: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from an explicit path.
    ///
    /// A missing or empty file yields the default config and a corrupt one is
    /// ignored with a warning. A file that exists but cannot be read is an
    /// error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt config file {:?}: {}", config_path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("grofer").join("config.json"))
    }

    pub fn set_refresh_ms(&mut self, refresh_ms: u64) -> Result<()> {
        anyhow::ensure!(
            refresh_ms >= MIN_REFRESH_MS,
            "Refresh rate must be at least {} ms (got {})",
            MIN_REFRESH_MS,
            refresh_ms
        );
        self.refresh_ms = refresh_ms;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Sampling hint handed to each round: four fifths of the refresh period,
    /// leaving headroom for the rest of the round.
    pub fn scrape_interval(&self) -> Duration {
        Duration::from_millis(4 * self.refresh_ms / 5)
    }

    pub fn round_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
