//! Identity service (SSO) client configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoConfig {
    #[serde(default = "default_host")]
    pub host: String,

    pub port: u16,

    /// Timeout for each individual attempt.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,

    /// Total attempts on transient failures, the first one included.
    #[serde(default = "default_retries")]
    pub retries_count: u32,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_ATTEMPT_TIMEOUT
}

fn default_retries() -> u32 {
    3
}

impl SsoConfig {
    /// gRPC endpoint URI.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub(crate) fn normalize(&mut self) {
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_ATTEMPT_TIMEOUT;
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Config("sso.host is empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::Config("sso.port must be non-zero".into()));
        }
        Ok(())
    }
}
