//! StorageEngine — owns the ConnectionPool and implements `ILocalStore`.

use std::path::Path;

use recsync_core::entity::{EntityKind, LocalRecord};
use recsync_core::errors::RecsyncResult;
use recsync_core::traits::ILocalStore;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::to_storage_err;

/// The local store. Owns the connection pool; runs migrations on open.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed
    /// mode). In-memory mode routes all reads through the writer since
    /// in-memory read connections are isolated databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, read_pool_size: usize) -> RecsyncResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> RecsyncResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> RecsyncResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> RecsyncResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> RecsyncResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl ILocalStore for StorageEngine {
    fn get(
        &self,
        kind: EntityKind,
        tenant_id: &str,
        external_id: &str,
    ) -> RecsyncResult<Option<LocalRecord>> {
        self.with_reader(|conn| {
            crate::queries::local_records::get_record(conn, kind, tenant_id, external_id)
        })
    }

    fn exists(
        &self,
        kind: EntityKind,
        tenant_id: &str,
        external_id: &str,
    ) -> RecsyncResult<bool> {
        self.with_reader(|conn| {
            crate::queries::local_records::record_exists(conn, kind, tenant_id, external_id)
        })
    }

    fn insert(&self, record: &LocalRecord) -> RecsyncResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::local_records::insert_record(conn, record))
    }

    fn update(&self, record: &LocalRecord) -> RecsyncResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::local_records::update_record(conn, record))
    }

    fn count(&self, kind: EntityKind, tenant_id: &str) -> RecsyncResult<usize> {
        self.with_reader(|conn| {
            crate::queries::local_records::count_records(conn, kind, tenant_id)
        })
    }

    fn ping(&self) -> RecsyncResult<()> {
        self.with_reader(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))
                .map_err(|e| to_storage_err(e.to_string()))
        })
    }
}
