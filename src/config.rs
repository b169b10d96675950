use crate::model::FieldType;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEBOUNCE_ENV: &str = "FORMCRAFT_DEBOUNCE_MS";
pub const LOG_ENV: &str = "FORMCRAFT_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quiet period before a field edit is committed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Field type whose rules apply to types that have none
    #[serde(default = "default_fallback_type")]
    pub fallback_type: FieldType,
    /// Log filter used when RUST_LOG is not set (e.g. "info", "formcraft=debug")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_debounce_ms() -> u64 {
    750
}

fn default_fallback_type() -> FieldType {
    FieldType::Text
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            fallback_type: default_fallback_type(),
            log_level: None,
        }
    }
}

impl EngineConfig {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("formcraft")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".formcraft")
        };
        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        Self::load_with_env(&Self::get_config_path()?)
    }

    /// Load a config file, then apply environment overrides (a `.env` file included)
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);
        if !path.exists() {
            debug!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }
        let content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        info!("Config saved to {:?}", path);
        Ok(())
    }

    /// Override values from environment variables
    ///
    /// `lookup` is `std::env::var` in production; unparsable values are
    /// logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(DEBOUNCE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.debounce_ms = ms,
                Err(_) => warn!("Ignoring {}={:?}: not a number of milliseconds", DEBOUNCE_ENV, raw),
            }
        }
        if let Some(level) = lookup(LOG_ENV) {
            if !level.trim().is_empty() {
                self.log_level = Some(level.trim().to_string());
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
