//! Versioned schema migrations, tracked in `schema_version`.

mod v001_entity_tables;

use rusqlite::Connection;

use recsync_core::errors::{RecsyncError, RecsyncResult, StorageError};

use crate::to_storage_err;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Apply all outstanding migrations.
pub fn run_migrations(conn: &Connection) -> RecsyncResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    for version in (current + 1)..=SCHEMA_VERSION {
        apply_version(conn, version).map_err(|e| {
            RecsyncError::Storage(StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })
        })?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::info!(version, "schema migration applied");
    }
    Ok(())
}

fn apply_version(conn: &Connection, version: u32) -> RecsyncResult<()> {
    match version {
        1 => v001_entity_tables::migrate(conn),
        other => Err(RecsyncError::Storage(StorageError::MigrationFailed {
            version: other,
            reason: "unknown migration version".to_string(),
        })),
    }
}
