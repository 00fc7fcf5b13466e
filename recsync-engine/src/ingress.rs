//! Batch ingress: parse each raw payload, sync it, aggregate counts.
//!
//! No record ever aborts the batch: parse failures become per-record
//! INVALID, storage faults become per-record ERROR, and the loop
//! continues. Intra-batch ordering is not assumed — a record whose
//! dependency sits later in the same batch is legitimately SKIPPED and
//! resubmitted by the caller.

use std::sync::Arc;

use recsync_core::decision::{IngestReport, SyncDecision};
use recsync_core::entity::{CanonicalRecord, EntityKind};
use recsync_core::traits::ILocalStore;

use crate::syncer::SyncService;

/// Accepts batches of raw source payloads for one entity kind.
pub struct BatchIngress {
    syncer: SyncService,
}

impl BatchIngress {
    pub fn new(store: Arc<dyn ILocalStore>) -> Self {
        Self {
            syncer: SyncService::new(store),
        }
    }

    /// Ingest one batch. Always returns a full report, one decision per
    /// input record, in input order.
    pub fn ingest(
        &self,
        kind: EntityKind,
        records: &[serde_json::Value],
        tenant_id: &str,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        for raw in records {
            let decision = match CanonicalRecord::parse(kind, raw) {
                Ok(canonical) => match self.syncer.sync(&canonical, tenant_id) {
                    Ok(decision) => decision,
                    Err(e) => {
                        tracing::error!(%kind, tenant_id, error = %e, "record sync failed");
                        SyncDecision::errored(canonical.external_id(), e.to_string())
                    }
                },
                Err(reason) => SyncDecision::invalid(best_effort_id(raw), reason),
            };
            report.push(decision);
        }
        tracing::info!(
            %kind,
            tenant_id,
            total = report.counts.total,
            new = report.counts.new,
            updated = report.counts.updated,
            skipped = report.counts.skipped,
            invalid = report.counts.invalid,
            errors = report.counts.errors,
            "batch ingested"
        );
        report
    }
}

/// Pull an id out of an unparseable payload so the INVALID decision can
/// still point at the offending record.
fn best_effort_id(raw: &serde_json::Value) -> String {
    match raw.get("id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
