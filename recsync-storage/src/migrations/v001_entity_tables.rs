//! v001: one local-view table per entity kind.
//!
//! All tables share the same shape: identity (tenant_id, external_id,
//! unique together), the canonical attributes as a JSON object, the
//! kind's denormalized ref columns (one per foreign reference, indexed
//! together with tenant_id because the dependency lookup runs once per
//! incoming record), the change-detection fingerprint, and lifecycle
//! metadata.

use rusqlite::Connection;

use recsync_core::entity::EntityKind;
use recsync_core::errors::RecsyncResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RecsyncResult<()> {
    for kind in EntityKind::ALL {
        let table = kind.table();
        let mut ref_columns = String::new();
        for spec in kind.refs() {
            ref_columns.push_str(&format!("            {} TEXT NOT NULL,\n", spec.column));
        }

        let ddl = format!(
            "
            CREATE TABLE IF NOT EXISTS {table} (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                tenant_id        TEXT NOT NULL,
                external_id      TEXT NOT NULL,
                attrs            TEXT NOT NULL,
    {ref_columns}
                fingerprint      TEXT NOT NULL,
                last_sync_status TEXT NOT NULL,
                created_at       TEXT NOT NULL,
                updated_at       TEXT NOT NULL,
                UNIQUE (tenant_id, external_id)
            );
            "
        );
        conn.execute_batch(&ddl)
            .map_err(|e| to_storage_err(format!("create {table}: {e}")))?;

        for spec in kind.refs() {
            let column = spec.column;
            conn.execute_batch(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_tenant_{column}
                 ON {table}(tenant_id, {column});"
            ))
            .map_err(|e| to_storage_err(format!("index {table}.{column}: {e}")))?;
        }
    }
    Ok(())
}
