/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("unique constraint violated for {table} ({tenant_id}, {external_id})")]
    ConstraintViolation {
        table: String,
        tenant_id: String,
        external_id: String,
    },

    #[error("connection pool lock poisoned: {reason}")]
    PoolPoisoned { reason: String },
}
