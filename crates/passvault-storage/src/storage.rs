//! The storage contract and backend factory.

use crate::deadline::Deadline;
use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::sqlite::SqliteStorage;
use async_trait::async_trait;
use passvault_core::config::{StorageBackend, StorageConfig};
use passvault_core::{AccountId, Entry, EntryId, KeyPart};
use std::sync::Arc;

/// Account-scoped persistence for entries and key parts.
///
/// Every lookup filters by `account_id`; a row owned by another account is
/// indistinguishable from a missing one. Implementations must be safe for
/// concurrent use and must stop work once `deadline` passes.
#[async_trait]
pub trait VaultStorage: Send + Sync {
    /// Insert a new entry and return its id.
    async fn save_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_type: &str,
        entry_data: &str,
    ) -> Result<EntryId, StorageError>;

    async fn get_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_id: EntryId,
    ) -> Result<Entry, StorageError>;

    /// All entries of the account, in id order. Empty if none.
    async fn list_entries(
        &self,
        deadline: Deadline,
        account_id: AccountId,
    ) -> Result<Vec<Entry>, StorageError>;

    /// Replace type and data of an existing entry.
    async fn update_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_id: EntryId,
        entry_type: &str,
        entry_data: &str,
    ) -> Result<(), StorageError>;

    async fn delete_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_id: EntryId,
    ) -> Result<(), StorageError>;

    /// Store the account's key part, replacing any previous one. Returns the
    /// key part's id, which is stable across replacements.
    async fn store_key_part(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        key_part: &str,
    ) -> Result<i64, StorageError>;

    async fn retrieve_key_part(
        &self,
        deadline: Deadline,
        account_id: AccountId,
    ) -> Result<KeyPart, StorageError>;

    async fn delete_key_part(
        &self,
        deadline: Deadline,
        account_id: AccountId,
    ) -> Result<(), StorageError>;

    /// Release backend resources. Called once on shutdown.
    async fn close(&self) {}
}

/// Create a storage backend based on configuration.
pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn VaultStorage>, StorageError> {
    match config.backend {
        StorageBackend::Sqlite => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| StorageError::unavailable("storage.path is not set"))?;
            Ok(Arc::new(SqliteStorage::connect(path).await?))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; entries are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
