//! # recsync-storage
//!
//! SQLite-backed local store: one table per entity kind, a single write
//! connection plus a WAL read pool, versioned migrations, and the
//! [`StorageEngine`] implementing `ILocalStore`.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use recsync_core::errors::{RecsyncError, StorageError};

/// Wrap a low-level SQLite message into the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> RecsyncError {
    RecsyncError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}
