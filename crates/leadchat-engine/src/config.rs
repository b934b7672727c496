//! Configuration types for the leadchat client.
//!
//! Configuration lives in `.leadchat/config.json`. Every field has a default,
//! so a missing or partial file still yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding leadchat's config and log file.
pub const LEADCHAT_DIR: &str = ".leadchat";

/// Environment variable that overrides [`Config::api_url`].
pub const API_URL_ENV: &str = "LEADCHAT_API_URL";

/// Main configuration for leadchat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the conversation backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Timeout in seconds for a single backend request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Where the TUI writes its log.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_api_url() -> String {
    "http://localhost:8000".into()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_log_file() -> PathBuf {
    Path::new(LEADCHAT_DIR).join("leadchat.log")
}

impl Config {
    /// Default location of the config file, relative to the working directory.
    pub fn default_path() -> PathBuf {
        Path::new(LEADCHAT_DIR).join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Apply the `LEADCHAT_API_URL` override, if set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }

    /// Replace the API URL when an override is given.
    #[must_use]
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout(),
            log_file: default_log_file(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
