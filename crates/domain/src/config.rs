//! Configuration structures
//!
//! Every section has serde defaults, so a config file only needs to name the
//! values it overrides.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOG_LEVEL, DEFAULT_TIMEOUT_MS,
    DEFAULT_USER_AGENT,
};
use crate::impl_config_enum_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ClientConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// HTTP client configuration, fixed once the transport is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address such as `https://host/api`, without a trailing slash
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with default timeout and user agent
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }.normalized()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Strip trailing slashes so paths can be appended verbatim
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        self.base_url = trimmed;
        self
    }
}

/// Where the session credential is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process-local; lost on exit
    Memory,
    /// Platform keychain
    Keychain,
    /// JSON file in the user's data directory
    #[default]
    File,
}

impl_config_enum_conversions!(SessionBackend {
    Memory => "memory",
    Keychain => "keychain",
    File => "file",
});

/// Session store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub keychain_service: String,
    /// Session file for the `file` backend; defaults to the data directory
    pub path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            path: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl_config_enum_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), format: LogFormat::default() }
    }
}
