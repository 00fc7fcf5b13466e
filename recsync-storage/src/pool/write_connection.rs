//! The single write connection. All row inserts/updates serialize
//! through its mutex, which is the per-row race backstop on top of the
//! (tenant_id, external_id) unique constraint.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use recsync_core::errors::{RecsyncError, RecsyncResult, StorageError};

use super::pragmas::apply_write_pragmas;
use crate::to_storage_err;

/// Owns the sole writable SQLite connection.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the write connection for a database file.
    pub fn open(path: &Path) -> RecsyncResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_write_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory write connection (for testing).
    pub fn open_in_memory() -> RecsyncResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_write_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure while holding the writer.
    pub fn with_conn_sync<F, T>(&self, f: F) -> RecsyncResult<T>
    where
        F: FnOnce(&Connection) -> RecsyncResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| {
            RecsyncError::Storage(StorageError::PoolPoisoned {
                reason: e.to_string(),
            })
        })?;
        f(&guard)
    }
}
