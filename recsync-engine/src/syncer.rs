//! The per-record decision state machine.
//!
//! One call, one decision, at most one row write:
//! validate → resolve dependencies → fingerprint → compare → apply.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use recsync_core::decision::{FieldChange, SyncDecision, SyncOutcome};
use recsync_core::entity::{CanonicalRecord, LocalRecord};
use recsync_core::errors::RecsyncResult;
use recsync_core::traits::ILocalStore;

use crate::resolver::DependencyResolver;

/// Decides and applies one record's sync against the local store.
pub struct SyncService {
    store: Arc<dyn ILocalStore>,
    resolver: DependencyResolver,
}

impl SyncService {
    pub fn new(store: Arc<dyn ILocalStore>) -> Self {
        let resolver = DependencyResolver::new(store.clone());
        Self { store, resolver }
    }

    /// Sync one canonical record for a tenant.
    ///
    /// INVALID and SKIPPED return without touching storage. A storage
    /// failure aborts this record only and propagates as `Err`; the
    /// batch layer turns it into an ERROR decision.
    pub fn sync(&self, record: &CanonicalRecord, tenant_id: &str) -> RecsyncResult<SyncDecision> {
        let kind = record.kind();
        let external_id = record.external_id().to_string();

        // 1. Structural validation.
        if let Err(reason) = record.validate() {
            tracing::debug!(%kind, external_id, reason, "record invalid");
            return Ok(SyncDecision::invalid(external_id, reason));
        }

        // 2. Dependency check (read-only).
        if let Some(missing) = self.resolver.first_missing(tenant_id, &record.lookup_refs())? {
            tracing::debug!(
                %kind,
                external_id,
                missing_kind = %missing.kind,
                missing_id = missing.external_id,
                "dependency not synced yet"
            );
            return Ok(SyncDecision::skipped(external_id, missing.skip_reason()));
        }

        // 3. Fingerprint the incoming record.
        let fingerprint = record.fingerprint();

        // 4. Compare against the stored row.
        let existing = self.store.get(kind, tenant_id, &external_id)?;
        let now = Utc::now();
        match existing {
            None => {
                let row = LocalRecord {
                    tenant_id: tenant_id.to_string(),
                    kind,
                    external_id: external_id.clone(),
                    attrs: record.attrs(),
                    refs: record.ref_values(),
                    fingerprint,
                    last_sync_status: SyncOutcome::New,
                    created_at: now,
                    updated_at: now,
                };
                self.store.insert(&row)?;
                tracing::info!(%kind, external_id, tenant_id, "record created");
                Ok(SyncDecision::created(external_id))
            }
            Some(stored) if stored.fingerprint == fingerprint => {
                // Attributes outside the fingerprint may differ; that is
                // the accepted trade-off for change detection by hash.
                Ok(SyncDecision::unchanged(external_id))
            }
            Some(stored) => {
                let changes = diff_fingerprinted(record, &stored);
                let row = LocalRecord {
                    tenant_id: tenant_id.to_string(),
                    kind,
                    external_id: external_id.clone(),
                    attrs: record.attrs(),
                    refs: record.ref_values(),
                    fingerprint,
                    last_sync_status: SyncOutcome::Updated,
                    created_at: stored.created_at,
                    updated_at: now,
                };
                self.store.update(&row)?;
                tracing::info!(
                    %kind,
                    external_id,
                    tenant_id,
                    changed = changes.len(),
                    "record updated"
                );
                Ok(SyncDecision::updated(external_id, changes))
            }
        }
    }
}

/// Field-by-field diff over the attributes covered by the fingerprint.
fn diff_fingerprinted(
    incoming: &CanonicalRecord,
    stored: &LocalRecord,
) -> BTreeMap<String, FieldChange> {
    let mut changes = BTreeMap::new();
    for (name, new_value) in incoming.fingerprint_fields() {
        let old_value = stored.attrs.get(name).cloned().flatten();
        if old_value != new_value {
            changes.insert(name.to_string(), (old_value, new_value));
        }
    }
    changes
}
