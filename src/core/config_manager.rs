// src/core/config_manager.rs
//! Unified configuration management - file, environment and command line

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::ui::UiTimings;

pub const DEFAULT_CONFIG_FILE: &str = "matcher.toml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigManager {
    pub service: ServiceConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub alert_dismiss_ms: u64,
    pub loading_timeout_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            alert_dismiss_ms: 5000,
            loading_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    service: ServiceConfig,
    ui: UiConfig,
}

impl ConfigManager {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise `matcher.toml` in the current
    /// directory is used when present. Environment variables override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_file(&default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let mut config = Self {
            service: file.service,
            ui: file.ui,
        };
        config.apply_env(|key| std::env::var(key).ok())?;

        info!("Matching backend: {}", config.service.base_url);
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<ConfigFile> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("MATCHER_API_URL") {
            self.service.base_url = url;
        }
        if let Some(timeout) = var("MATCHER_REQUEST_TIMEOUT_SECS") {
            self.service.request_timeout_secs = timeout
                .parse()
                .context("MATCHER_REQUEST_TIMEOUT_SECS must be a number of seconds")?;
        }
        Ok(())
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.service.base_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.request_timeout_secs)
    }

    pub fn timings(&self) -> UiTimings {
        UiTimings {
            alert_dismiss: Duration::from_millis(self.ui.alert_dismiss_ms),
            loading_timeout: Duration::from_secs(self.ui.loading_timeout_secs),
        }
    }
}
