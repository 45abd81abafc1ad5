//! Configuration types for the passvault backend.
//!
//! Configuration is loaded from a single YAML file (see `config/local.yaml`
//! in the repository root for an example) and never mutated after startup.
//!
//! # Resolution order for the file path
//!
//! 1. `--config` flag passed to the binary
//! 2. `PASSVAULT_CONFIG` environment variable
//! 3. `CONFIG_PATH` environment variable
//!
//! The signing secret can be supplied through `PASSVAULT_SECRET` instead of
//! the file.

pub mod http_server;
pub mod sso;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use http_server::HttpServerConfig;
pub use sso::SsoConfig;
pub use storage::{StorageBackend, StorageConfig};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PASSVAULT_CONFIG";

/// Fallback environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Environment variable overriding the signing secret.
pub const SECRET_ENV: &str = "PASSVAULT_SECRET";

/// Deployment environment. Drives log format and default verbosity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

impl Environment {
    /// Default `tracing` filter directive for this environment.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => "debug",
            Environment::Prod => "info",
        }
    }

    /// Whether logs should be emitted as JSON lines.
    pub fn json_logs(&self) -> bool {
        !matches!(self, Environment::Local)
    }
}

/// Complete passvault configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub env: Environment,

    /// Where entries and key parts are persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Shared HMAC secret used to verify bearer tokens.
    #[serde(default)]
    pub secret: String,

    #[serde(default)]
    pub http_server: HttpServerConfig,

    /// Identity service connection. `/register` is only served when set.
    #[serde(default)]
    pub sso: Option<SsoConfig>,
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("env", &self.env)
            .field("storage", &self.storage)
            .field("secret", &"<redacted>")
            .field("http_server", &self.http_server)
            .field("sso", &self.sso)
            .finish()
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config path is empty (pass --config or set {CONFIG_ENV})")]
    MissingPath,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VaultConfig {
    /// Resolve the config file path from an optional CLI flag and the environment.
    pub fn resolve_path(flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        flag.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingPath)
    }

    /// Load, apply environment overrides, normalise and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        if let Ok(secret) = std::env::var(SECRET_ENV)
            && !secret.is_empty()
        {
            config.secret = secret;
        }
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file without validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content without validation.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Replace zero durations with their defaults.
    pub fn normalize(&mut self) {
        self.http_server.normalize();
        if let Some(sso) = self.sso.as_mut() {
            sso.normalize();
        }
    }

    /// Check invariants the server relies on at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::Config(format!(
                "signing secret is empty (set `secret` or {SECRET_ENV})"
            )));
        }
        self.storage.validate()?;
        self.http_server.validate()?;
        if let Some(sso) = &self.sso {
            sso.validate()?;
        }
        Ok(())
    }
}
