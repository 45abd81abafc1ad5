//! SQLite backend.

use crate::deadline::Deadline;
use crate::error::StorageError;
use crate::storage::VaultStorage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use passvault_core::{AccountId, Entry, EntryId, KeyPart};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    account_id: i64,
    entry_type: String,
    entry_data: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            id: row.id,
            account_id: row.account_id,
            entry_type: row.entry_type,
            entry_data: row.entry_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct KeyPartRow {
    id: i64,
    account_id: i64,
    key_part: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<KeyPartRow> for KeyPart {
    fn from(row: KeyPartRow) -> Self {
        KeyPart {
            id: row.id,
            account_id: row.account_id,
            key_part: row.key_part,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Storage backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub async fn connect(path: &str) -> Result<Self, StorageError> {
        ensure_parent_dir(path)?;
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        tracing::info!(path = %path, "Opened SQLite storage");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, one per call.
    pub async fn in_memory() -> Result<Self, StorageError> {
        // Every connection to :memory: is a new database, so pin the pool to one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::new().in_memory(true))
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl VaultStorage for SqliteStorage {
    async fn save_entry(
        &self,
        deadline: Deadline,
        account_id: AccountId,
        entry_type: &str,
        entry_data: &str,
    ) -> Result<EntryId, StorageError> {
        deadline
            .run(async {
                let now = Utc::now();
                let result = sqlx::query(
                    "INSERT INTO entries (account_id, entry_type, entry_data, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(account_id)
                .bind(entry_type)
                .bind(entry_data)
                .bind(now)
                .bind(now)
                .execute(&self.pool)
                .await?;
                Ok(result.last_insert_rowid())
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
                let row: Option<EntryRow> = sqlx::query_as(
                    "SELECT id, account_id, entry_type, entry_data, created_at, updated_at \
                     FROM entries WHERE id = ? AND account_id = ?",
                )
                .bind(entry_id)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
                row.map(Entry::from).ok_or(StorageError::NotFound)
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
                let rows: Vec<EntryRow> = sqlx::query_as(
                    "SELECT id, account_id, entry_type, entry_data, created_at, updated_at \
                     FROM entries WHERE account_id = ? ORDER BY id",
                )
                .bind(account_id)
                .fetch_all(&self.pool)
                .await?;
                Ok(rows.into_iter().map(Entry::from).collect())
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
                let result = sqlx::query(
                    "UPDATE entries SET entry_type = ?, entry_data = ?, updated_at = ? \
                     WHERE id = ? AND account_id = ?",
                )
                .bind(entry_type)
                .bind(entry_data)
                .bind(Utc::now())
                .bind(entry_id)
                .bind(account_id)
                .execute(&self.pool)
                .await?;
                if result.rows_affected() == 0 {
                    return Err(StorageError::NotFound);
                }
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
                let result = sqlx::query("DELETE FROM entries WHERE id = ? AND account_id = ?")
                    .bind(entry_id)
                    .bind(account_id)
                    .execute(&self.pool)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(StorageError::NotFound);
                }
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
                let now = Utc::now();
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO key_parts (account_id, key_part, created_at, updated_at) \
                     VALUES (?, ?, ?, ?) \
                     ON CONFLICT(account_id) DO UPDATE SET \
                         key_part = excluded.key_part, \
                         updated_at = excluded.updated_at \
                     RETURNING id",
                )
                .bind(account_id)
                .bind(key_part)
                .bind(now)
                .bind(now)
                .fetch_one(&self.pool)
                .await?;
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
                let row: Option<KeyPartRow> = sqlx::query_as(
                    "SELECT id, account_id, key_part, created_at, updated_at \
                     FROM key_parts WHERE account_id = ?",
                )
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
                row.map(KeyPart::from).ok_or(StorageError::NotFound)
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
                let result = sqlx::query("DELETE FROM key_parts WHERE account_id = ?")
                    .bind(account_id)
                    .execute(&self.pool)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(StorageError::NotFound);
                }
                Ok(())
            })
            .await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite storage closed");
    }
}

fn ensure_parent_dir(file_path: &str) -> Result<(), StorageError> {
    let p = Path::new(file_path);
    if let Some(parent) = p.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            StorageError::unavailable(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    Ok(())
}
