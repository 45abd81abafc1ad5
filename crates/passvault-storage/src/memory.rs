//! In-process backend.

use crate::deadline::Deadline;
use crate::error::StorageError;
use crate::storage::VaultStorage;
use async_trait::async_trait;
use chrono::Utc;
use passvault_core::{AccountId, Entry, EntryId, KeyPart};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    last_entry_id: EntryId,
    entries: BTreeMap<EntryId, Entry>,
    last_key_part_id: i64,
    key_parts: HashMap<AccountId, KeyPart>,
}

/// Storage kept in process memory. Ids are never reused.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|e| StorageError::unavailable(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|e| StorageError::unavailable(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl VaultStorage for MemoryStorage {
    async fn save_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_type: &str,
        entry_data: &str,
    ) -> Result<EntryId, StorageError> {
        deadline
            .run(async {
                let mut tables = self.write()?;
                tables.last_entry_id += 1;
                let id = tables.last_entry_id;
                let now = Utc::now();
                tables.entries.insert(
                    id,
                    Entry {
                        id,
                        account_id,
                        entry_type: entry_type.to_string(),
                        entry_data: entry_data.to_string(),
                        created_at: now,
                        updated_at: now,
                    },
                );
                Ok(id)
            })
            .await
    }

    async fn get_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_id: EntryId,
    ) -> Result<Entry, StorageError> {
        deadline
            .run(async {
                self.read()?
                    .entries
                    .get(&entry_id)
                    .filter(|entry| entry.is_owned_by(account_id))
                    .cloned()
                    .ok_or(StorageError::NotFound)
            })
            .await
    }

    async fn list_entries(
        &self,
        deadline: Deadline,
        account_id: AccountId,
    ) -> Result<Vec<Entry>, StorageError> {
        deadline
            .run(async {
                Ok(self
                    .read()?
                    .entries
                    .values()
                    .filter(|entry| entry.is_owned_by(account_id))
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn update_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_id: EntryId,
        entry_type: &str,
        entry_data: &str,
    ) -> Result<(), StorageError> {
        deadline
            .run(async {
                let mut tables = self.write()?;
                let entry = tables
                    .entries
                    .get_mut(&entry_id)
                    .filter(|entry| entry.is_owned_by(account_id))
                    .ok_or(StorageError::NotFound)?;
                entry.entry_type = entry_type.to_string();
                entry.entry_data = entry_data.to_string();
                entry.updated_at = Utc::now();
                Ok(())
            })
            .await
    }

    async fn delete_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_id: EntryId,
    ) -> Result<(), StorageError> {
        deadline
            .run(async {
                let mut tables = self.write()?;
                let owned = tables
                    .entries
                    .get(&entry_id)
                    .is_some_and(|entry| entry.is_owned_by(account_id));
                if !owned {
                    return Err(StorageError::NotFound);
                }
                tables.entries.remove(&entry_id);
                Ok(())
            })
            .await
    }

    async fn store_key_part(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        key_part: &str,
    ) -> Result<i64, StorageError> {
        deadline
            .run(async {
                let mut guard = self.write()?;
                let tables = &mut *guard;
                let now = Utc::now();
                if let Some(existing) = tables.key_parts.get_mut(&account_id) {
                    existing.key_part = key_part.to_string();
                    existing.updated_at = now;
                    return Ok(existing.id);
                }

                tables.last_key_part_id += 1;
                let id = tables.last_key_part_id;
                tables.key_parts.insert(
                    account_id,
                    KeyPart {
                        id,
                        account_id,
                        key_part: key_part.to_string(),
                        created_at: now,
                        updated_at: now,
                    },
                );
                Ok(id)
            })
            .await
    }

    async fn retrieve_key_part(
        &self,
        deadline: Deadline,
        account_id: AccountId,
    ) -> Result<KeyPart, StorageError> {
        deadline
            .run(async {
                self.read()?
                    .key_parts
                    .get(&account_id)
                    .cloned()
                    .ok_or(StorageError::NotFound)
            })
            .await
    }

    async fn delete_key_part(
        &self,
        deadline: Deadline,
        account_id: AccountId,
    ) -> Result<(), StorageError> {
        deadline
            .run(async {
                self.write()?
                    .key_parts
                    .remove(&account_id)
                    .map(|_| ())
                    .ok_or(StorageError::NotFound)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let storage = MemoryStorage::new();
        let deadline = Deadline::after(Duration::from_secs(1));

        let first = storage.save_entry(deadline, 1, "note", "a").await.unwrap();
        storage.delete_entry(deadline, 1, first).await.unwrap();
        let second = storage.save_entry(deadline, 1, "note", "b").await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_expired_deadline_does_not_write() {
        let storage = MemoryStorage::new();
        let expired = Deadline::after(Duration::ZERO);

        let err = storage.save_entry(expired, 1, "note", "a").await.unwrap_err();
        assert!(matches!(err, StorageError::Timeout));

        let deadline = Deadline::after(Duration::from_secs(1));
        assert!(storage.list_entries(deadline, 1).await.unwrap().is_empty());
    }
}
