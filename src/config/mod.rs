//! Configuration management.
//!
//! Settings are layered: built-in defaults, then the optional
//! `config.json` in the XDG config directory, then command-line flags
//! (which clap also fills from `AI_CHAT_*` environment variables).

mod xdg;

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use xdg::XdgDirs;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://server-xjqa.onrender.com/chat";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

/// Runtime configuration for the chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// URL the chat request is POSTed to
    pub endpoint: String,
    /// Per-request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
    /// Log file for the TUI; defaults to the XDG state directory
    pub log_file: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            log_file: None,
        }
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ChatConfig {
    /// Load from the config file in the given XDG directories.
    pub fn load(dirs: &XdgDirs) -> Result<Self, ConfigError> {
        Self::load_from(&dirs.config_file())
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = serde_json::from_str(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply overrides on top of this config.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = Some(secs);
        }
        if let Some(path) = overrides.log_file {
            self.log_file = Some(path);
        }
        self
    }

    /// Parse the endpoint, accepting only http(s) URLs.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", self.endpoint, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                self.endpoint, other
            ))),
        }
    }

    /// Request timeout, if one is configured. Zero means none.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Resolve the log file path against the XDG state directory.
    pub fn log_file_or(&self, dirs: &XdgDirs) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| dirs.default_log_file())
    }
}
