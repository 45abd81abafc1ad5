//! # passvault-storage
//!
//! Persistence for vault entries and key parts, always scoped by account id.
//!
//! Every operation takes a [`Deadline`]. When it elapses the in-flight
//! operation is dropped (releasing its connection) and
//! [`StorageError::Timeout`] is returned, distinct from other failures.
//!
//! ## Backends
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | SQLite | [`SqliteStorage`] | default, file-backed |
//! | Memory | [`MemoryStorage`] | tests and throwaway instances |

pub mod deadline;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod storage;

pub use deadline::Deadline;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use storage::{VaultStorage, create_storage};
