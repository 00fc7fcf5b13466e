//! Connection pragmas: WAL journaling for writer/reader separation,
//! busy timeout so concurrent batch calls queue instead of erroring.

use rusqlite::Connection;

use recsync_core::errors::RecsyncResult;

use crate::to_storage_err;

/// Pragmas for the single write connection.
pub fn apply_write_pragmas(conn: &Connection) -> RecsyncResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Pragmas for read-pool connections.
pub fn apply_read_pragmas(conn: &Connection) -> RecsyncResult<()> {
    conn.execute_batch(
        "
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
