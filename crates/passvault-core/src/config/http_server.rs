//! HTTP listener configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for the REST listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080".
    #[serde(default = "default_address")]
    pub address: String,

    /// Deadline applied to every handler and its storage calls.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,

    /// Outer cap on a whole request exchange, body read included.
    #[serde(with = "humantime_serde", default = "default_idle_timeout")]
    pub idle_timeout: Duration,
}

fn default_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_idle_timeout() -> Duration {
    DEFAULT_IDLE_TIMEOUT
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout: default_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl HttpServerConfig {
    pub(crate) fn normalize(&mut self) {
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        if self.idle_timeout.is_zero() {
            self.idle_timeout = DEFAULT_IDLE_TIMEOUT;
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::Config("http_server.address is empty".into()));
        }
        if self.timeout.is_zero() || self.idle_timeout.is_zero() {
            return Err(ConfigError::Config("http_server timeouts must be non-zero".into()));
        }
        Ok(())
    }
}
