//! Connection pool managing the write connection and the read pool.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::Path;

use recsync_core::errors::RecsyncResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    pub fn open(path: &Path, read_pool_size: usize) -> RecsyncResult<Self> {
        let writer = WriteConnection::open(path)?;
        let readers = ReadPool::open(path, read_pool_size)?;
        Ok(Self { writer, readers })
    }

    /// Open an in-memory connection pool (for testing). Readers are
    /// isolated databases in this mode; the engine routes reads through
    /// the writer instead.
    pub fn open_in_memory(read_pool_size: usize) -> RecsyncResult<Self> {
        let writer = WriteConnection::open_in_memory()?;
        let readers = ReadPool::open_in_memory(read_pool_size)?;
        Ok(Self { writer, readers })
    }
}
