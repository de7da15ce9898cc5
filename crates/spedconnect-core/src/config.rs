//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, header scheme and last used email.
//!
//! Configuration is stored at `~/.config/sped-connect/config.json`. The
//! `SPED_CONNECT_BASE_URL` environment variable takes precedence over the
//! stored base URL.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::AuthScheme;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "sped-connect";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "SPED_CONNECT_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_email: Option<String>,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL from the environment, falling back to the config file.
    pub fn base_url(&self) -> Result<String> {
        self.resolve_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_base_url(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone().filter(|url| !url.trim().is_empty()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API base URL configured. Set {} or add base_url to the config file.",
                    BASE_URL_ENV
                )
            })
    }
}
