//! Service configuration from environment variables.
//!
//! # Responsibility
//! - Read store target, listen address, retry backoff and logging settings.
//! - Reject malformed values instead of silently falling back.
//!
//! # Invariants
//! - Unset variables take documented defaults; set-but-invalid ones are errors.
//! - `retry_backoff` is never zero.

use crate::logging::default_log_level;
use crate::supervisor::DEFAULT_RETRY_BACKOFF;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const ENV_STORE_URL: &str = "CATALOGUE_STORE_URL";
pub const ENV_PORT: &str = "CATALOGUE_PORT";
pub const ENV_BIND_HOST: &str = "CATALOGUE_BIND_HOST";
pub const ENV_RETRY_BACKOFF_MS: &str = "CATALOGUE_RETRY_BACKOFF_MS";
pub const ENV_LOG_LEVEL: &str = "CATALOGUE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATALOGUE_LOG_DIR";

const DEFAULT_STORE_URL: &str = "catalogue.sqlite3";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} value `{}`: {}",
            self.variable, self.value, self.message
        )
    }
}

impl Error for ConfigError {}

/// Runtime settings for the catalogue server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Store connection string (path or `file:` URI).
    pub store_url: String,
    pub bind_host: IpAddr,
    pub port: u16,
    pub retry_backoff: Duration,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr only when `None`.
    pub log_dir: Option<String>,
}

impl ServiceConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let store_url = read(ENV_STORE_URL).unwrap_or_else(|| DEFAULT_STORE_URL.to_string());

        let bind_host = match read(ENV_BIND_HOST) {
            Some(value) => value.trim().parse::<IpAddr>().map_err(|err| ConfigError {
                variable: ENV_BIND_HOST,
                value: value.clone(),
                message: err.to_string(),
            })?,
            None => DEFAULT_BIND_HOST.parse().map_err(|_| ConfigError {
                variable: ENV_BIND_HOST,
                value: DEFAULT_BIND_HOST.to_string(),
                message: "default host is not an IP address".to_string(),
            })?,
        };

        let port = match read(ENV_PORT) {
            Some(value) => value.trim().parse::<u16>().map_err(|err| ConfigError {
                variable: ENV_PORT,
                value: value.clone(),
                message: err.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let retry_backoff = match read(ENV_RETRY_BACKOFF_MS) {
            Some(value) => parse_backoff(&value)?,
            None => DEFAULT_RETRY_BACKOFF,
        };

        Ok(Self {
            store_url,
            bind_host,
            port,
            retry_backoff,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_host, self.port)
    }
}

fn parse_backoff(value: &str) -> Result<Duration, ConfigError> {
    let millis = value.trim().parse::<u64>().map_err(|err| ConfigError {
        variable: ENV_RETRY_BACKOFF_MS,
        value: value.to_string(),
        message: err.to_string(),
    })?;
    if millis == 0 {
        return Err(ConfigError {
            variable: ENV_RETRY_BACKOFF_MS,
            value: value.to_string(),
            message: "backoff must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}
