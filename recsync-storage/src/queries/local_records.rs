//! Insert, update, lookup, and dependency-check queries for the
//! per-entity local-view tables.
//!
//! Table and ref-column names come from `EntityKind` metadata (a closed
//! enum), so the `format!`-built statements never interpolate caller
//! input; all values go through placeholders.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use recsync_core::decision::SyncOutcome;
use recsync_core::entity::{EntityKind, LocalRecord};
use recsync_core::errors::{RecsyncError, RecsyncResult, StorageError};

use crate::to_storage_err;

/// Insert a new local record. A unique-constraint hit surfaces as
/// [`StorageError::ConstraintViolation`] so the caller can distinguish
/// a double-insert race from other failures.
pub fn insert_record(conn: &Connection, record: &LocalRecord) -> RecsyncResult<()> {
    let table = record.kind.table();
    let attrs_json =
        serde_json::to_string(&record.attrs).map_err(|e| to_storage_err(e.to_string()))?;

    let mut columns: Vec<&str> = vec!["tenant_id", "external_id", "attrs"];
    let mut values: Vec<String> = vec![
        record.tenant_id.clone(),
        record.external_id.clone(),
        attrs_json,
    ];
    for spec in record.kind.refs() {
        columns.push(spec.column);
        values.push(record.refs.get(spec.column).cloned().unwrap_or_default());
    }
    columns.extend(["fingerprint", "last_sync_status", "created_at", "updated_at"]);
    values.push(record.fingerprint.clone());
    values.push(record.last_sync_status.as_str().to_string());
    values.push(record.created_at.to_rfc3339());
    values.push(record.updated_at.to_rfc3339());

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );

    conn.execute(&sql, params_from_iter(values))
        .map_err(|e| constraint_or_storage_err(e, record))?;
    Ok(())
}

/// Update an existing local record in place: attributes, refs,
/// fingerprint, status, and `updated_at`. `created_at` never changes.
pub fn update_record(conn: &Connection, record: &LocalRecord) -> RecsyncResult<()> {
    let table = record.kind.table();
    let attrs_json =
        serde_json::to_string(&record.attrs).map_err(|e| to_storage_err(e.to_string()))?;

    let mut assignments: Vec<String> = vec!["attrs = ?".to_string()];
    let mut values: Vec<String> = vec![attrs_json];
    for spec in record.kind.refs() {
        assignments.push(format!("{} = ?", spec.column));
        values.push(record.refs.get(spec.column).cloned().unwrap_or_default());
    }
    assignments.push("fingerprint = ?".to_string());
    assignments.push("last_sync_status = ?".to_string());
    assignments.push("updated_at = ?".to_string());
    values.push(record.fingerprint.clone());
    values.push(record.last_sync_status.as_str().to_string());
    values.push(record.updated_at.to_rfc3339());
    values.push(record.tenant_id.clone());
    values.push(record.external_id.clone());

    let sql = format!(
        "UPDATE {table} SET {} WHERE tenant_id = ? AND external_id = ?",
        assignments.join(", ")
    );
    let changed = conn
        .execute(&sql, params_from_iter(values))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(to_storage_err(format!(
            "update of missing row {}/{}",
            table, record.external_id
        )));
    }
    Ok(())
}

/// Fetch one local record by (tenant, external id).
pub fn get_record(
    conn: &Connection,
    kind: EntityKind,
    tenant_id: &str,
    external_id: &str,
) -> RecsyncResult<Option<LocalRecord>> {
    let table = kind.table();
    let ref_columns: Vec<&str> = kind.refs().iter().map(|s| s.column).collect();
    let ref_select = if ref_columns.is_empty() {
        String::new()
    } else {
        format!(", {}", ref_columns.join(", "))
    };
    let sql = format!(
        "SELECT attrs, fingerprint, last_sync_status, created_at, updated_at{ref_select}
         FROM {table} WHERE tenant_id = ?1 AND external_id = ?2"
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let row = stmt
        .query_row(params![tenant_id, external_id], |row| {
            let attrs_json: String = row.get(0)?;
            let fingerprint: String = row.get(1)?;
            let status: String = row.get(2)?;
            let created_at: String = row.get(3)?;
            let updated_at: String = row.get(4)?;
            let mut refs = BTreeMap::new();
            for (i, column) in ref_columns.iter().enumerate() {
                let value: String = row.get(5 + i)?;
                refs.insert(column.to_string(), value);
            }
            Ok((attrs_json, fingerprint, status, created_at, updated_at, refs))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((attrs_json, fingerprint, status, created_at, updated_at, refs)) = row else {
        return Ok(None);
    };

    let attrs: BTreeMap<String, Option<String>> =
        serde_json::from_str(&attrs_json).map_err(|e| to_storage_err(e.to_string()))?;
    Ok(Some(LocalRecord {
        tenant_id: tenant_id.to_string(),
        kind,
        external_id: external_id.to_string(),
        attrs,
        refs,
        fingerprint,
        last_sync_status: SyncOutcome::parse(&status).unwrap_or(SyncOutcome::Error),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    }))
}

/// Read-only dependency check: does (tenant, external id) exist?
pub fn record_exists(
    conn: &Connection,
    kind: EntityKind,
    tenant_id: &str,
    external_id: &str,
) -> RecsyncResult<bool> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE tenant_id = ?1 AND external_id = ?2 LIMIT 1",
        kind.table()
    );
    let found = conn
        .query_row(&sql, params![tenant_id, external_id], |_| Ok(()))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(found.is_some())
}

/// Count rows of one kind for a tenant.
pub fn count_records(conn: &Connection, kind: EntityKind, tenant_id: &str) -> RecsyncResult<usize> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE tenant_id = ?1", kind.table());
    conn.query_row(&sql, params![tenant_id], |row| row.get::<_, usize>(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

fn parse_timestamp(raw: &str) -> RecsyncResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {raw}: {e}")))
}

fn constraint_or_storage_err(e: rusqlite::Error, record: &LocalRecord) -> RecsyncError {
    if let rusqlite::Error::SqliteFailure(code, _) = &e {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return RecsyncError::Storage(StorageError::ConstraintViolation {
                table: record.kind.table().to_string(),
                tenant_id: record.tenant_id.clone(),
                external_id: record.external_id.clone(),
            });
        }
    }
    to_storage_err(e.to_string())
}
