//! Application configuration management.
//!
//! This module handles loading the application configuration:
//! the API base URL, request timeout, cache location and staleness limits.
//!
//! Configuration is stored at `~/.config/rocketcache/config.json`. The
//! `ROCKETCACHE_API_URL` and `ROCKETCACHE_CACHE_DIR` environment variables
//! override the file.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use tracing::debug;

use crate::api::DEFAULT_BASE_URL;
use crate::repository::StalenessPolicy;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "rocketcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const API_URL_ENV: &str = "ROCKETCACHE_API_URL";
const CACHE_DIR_ENV: &str = "ROCKETCACHE_CACHE_DIR";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub launches_stale_hours: i64,
    pub company_stale_days: i64,
    /// Overrides the platform cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
            launches_stale_hours: 24,
            company_stale_days: 7,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent), then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(API_URL_ENV).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(dir) = var(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_secs)
    }

    pub fn staleness(&self) -> StalenessPolicy {
        StalenessPolicy {
            launches_max_age: Duration::hours(self.launches_stale_hours),
            company_max_age: Duration::days(self.company_stale_days),
        }
    }
}
