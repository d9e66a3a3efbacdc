//! Client configuration loading.
//!
//! All knobs have serde defaults so an empty TOML document (or
//! `ClientConfig::default()`) yields a working client: `!` prefix,
//! case-sensitive commands, default intents, 30 second connect timeout.

use crate::intents::Intents;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// File read, but is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Command routing configuration.
    #[serde(default)]
    pub command: CommandConfig,
    /// Connection and reconnect configuration.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Raw capability flag bits. Validated against [`Intents`] by
    /// `connect()` before any network I/O.
    #[serde(default = "default_intents")]
    pub intents: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            command: CommandConfig::default(),
            connection: ConnectionConfig::default(),
            intents: default_intents(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Command routing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    /// Prefix that marks a message as a command attempt.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Fold command tokens case-insensitively when resolving.
    #[serde(default)]
    pub case_insensitive: bool,
    /// Install the built-in help command.
    #[serde(default = "default_true")]
    pub help: bool,
}

impl Default for CommandConfig {
    fn default() -> Self {
        CommandConfig {
            prefix: default_prefix(),
            case_insensitive: false,
            help: true,
        }
    }
}

/// Connection and reconnect configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Bound on one session-establishment attempt, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Base delay between reconnect attempts, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Random jitter added on top of the base delay, in milliseconds.
    /// Zero disables jitter (tests rely on this).
    #[serde(default = "default_reconnect_jitter")]
    pub reconnect_jitter_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            connect_timeout_secs: default_connect_timeout(),
            reconnect_delay_ms: default_reconnect_delay(),
            reconnect_jitter_ms: default_reconnect_jitter(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_reconnect_delay() -> u64 {
    5000
}

fn default_reconnect_jitter() -> u64 {
    1000
}

fn default_intents() -> u64 {
    Intents::default().bits()
}
