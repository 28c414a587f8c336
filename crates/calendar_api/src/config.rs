//! Server configuration loaded from environment variables.
//!
//! | variable             | default                         |
//! |----------------------|---------------------------------|
//! | `CALENDAR_DB_PATH`   | `<temp dir>/calendar.sqlite3`   |
//! | `CALENDAR_BIND_ADDR` | `127.0.0.1:5281`                |
//! | `CALENDAR_LOG_LEVEL` | `debug` (debug) / `info` (release) |
//! | `CALENDAR_LOG_DIR`   | unset: log to stderr            |
//!
//! Values are trimmed; empty values count as unset.

use calendar_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "CALENDAR_DB_PATH";
pub const BIND_ADDR_VAR: &str = "CALENDAR_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "CALENDAR_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CALENDAR_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "calendar.sqlite3";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5281";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr { value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, reason } => {
                write!(f, "invalid {BIND_ADDR_VAR} `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let db_path = value(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let raw_addr = value(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level: value(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_VAR),
        })
    }
}
