//! # passvault-core
//!
//! Shared domain types and configuration for the passvault backend.
//!
//! Entries and key parts are stored as opaque strings: the server never
//! interprets `entry_data` or `key_part`, encryption is the client's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Configuration types shared across all passvault crates
pub mod config;

pub use config::{
    ConfigError, Environment, HttpServerConfig, SsoConfig, StorageBackend, StorageConfig,
    VaultConfig,
};

/// Tenant/owner identifier. Every entry and key part is scoped by it.
pub type AccountId = i64;

/// Storage-assigned entry identifier (monotonic per store).
pub type EntryId = i64;

/// One stored vault record owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub entry_type: String,
    pub entry_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The single key part held for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPart {
    pub id: i64,
    pub account_id: AccountId,
    pub key_part: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Whether this entry belongs to `account_id`.
    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.account_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_ownership() {
        let now = Utc::now();
        let entry = Entry {
            id: 1,
            account_id: 123,
            entry_type: "password".into(),
            entry_data: "supersecretpassword".into(),
            created_at: now,
            updated_at: now,
        };

        assert!(entry.is_owned_by(123));
        assert!(!entry.is_owned_by(456));
    }

    #[test]
    fn test_entry_json_shape() {
        let now = Utc::now();
        let entry = Entry {
            id: 7,
            account_id: 123,
            entry_type: "note".into(),
            entry_data: "opaque".into(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["entry_type"], "note");
        assert_eq!(value["entry_data"], "opaque");
    }
}
