//! Persistence backend configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Storage backend type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite database file (default).
    #[default]
    Sqlite,
    /// Process-local maps; contents are lost on restart.
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite file. Required for the sqlite backend.
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            StorageBackend::Sqlite => match self.path.as_deref() {
                Some(p) if !p.trim().is_empty() => Ok(()),
                _ => Err(ConfigError::Config(
                    "storage.path is required for the sqlite backend".into(),
                )),
            },
            StorageBackend::Memory => Ok(()),
        }
    }
}
