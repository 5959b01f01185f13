//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Value of `db_path` that selects the in-memory employee store.
pub const IN_MEMORY_DB: &str = ":memory:";

/// Settings for the HTTP server.
///
/// Loaded from TOML; every key is optional. Command-line flags override
/// file values through the `with_*` setters.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite file for employees, or `:memory:`.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Whether new games may have repeated digits when the request does not say.
    #[serde(default = "default_allow_repeats")]
    allow_repeats: bool,

    /// Insert sample employees into an empty store at startup.
    #[serde(default)]
    seed: bool,

    /// Drop game sessions idle this many seconds. Unset keeps them forever.
    #[serde(default)]
    #[setters(strip_option)]
    session_idle_ttl_secs: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "lab_apis.db".to_string()
}

fn default_allow_repeats() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            allow_repeats: default_allow_repeats(),
            seed: false,
            session_idle_ttl_secs: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(address = %config.bind_address(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.session_idle_ttl_secs == Some(0) {
            return Err(ConfigError::new(
                "session_idle_ttl_secs must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when `db_path` selects the in-memory store.
    pub fn uses_memory_store(&self) -> bool {
        self.db_path == IN_MEMORY_DB
    }

    /// Idle lifetime of a game session, if sessions expire.
    pub fn session_idle_ttl(&self) -> Option<Duration> {
        self.session_idle_ttl_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
