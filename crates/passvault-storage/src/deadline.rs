//! Request-scoped deadlines.

use crate::error::StorageError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Point in time after which a storage call must give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drive `operation` until it completes or the deadline passes.
    ///
    /// On expiry the operation future is dropped, cancelling whatever it had
    /// in flight. An already-expired deadline never starts the operation.
    pub async fn run<F, T>(&self, operation: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        if self.is_expired() {
            return Err(StorageError::Timeout);
        }
        match tokio::time::timeout_at(self.at, operation).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout),
        }
    }
}
