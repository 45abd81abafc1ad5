//! Error types for the storage crate.

use thiserror::Error;

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No row for this account and id. Also returned for rows owned by a
    /// different account.
    #[error("not found")]
    NotFound,

    /// The caller's deadline elapsed before the operation finished.
    #[error("storage deadline exceeded")]
    Timeout,

    /// Backend failure (connection, query, lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::PoolTimedOut => StorageError::Timeout,
            other => StorageError::Unavailable(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::Unavailable(format!("migration failed: {err}"))
    }
}
