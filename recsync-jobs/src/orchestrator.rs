//! Full-sync step runner.
//!
//! A run walks the derived step order; within a step it pages through
//! the source, parses each row, and pushes the transformed payload to
//! the target. One bad record never stops a step, and one failed step
//! never stops the job. A missing parent on the target side triggers
//! auto-repair: pull that parent from the source, push it, retry the
//! child exactly once.

use std::sync::Arc;

use recsync_core::entity::{full_sync_step_order, CanonicalRecord, EntityKind};
use recsync_core::errors::EngineError;

use recsync_clients::{SourceApi, TargetApi, TargetOutcome};

use crate::job::{JobState, StepResult, SyncJob};
use crate::registry::{lock_job, JobHandle, JobRegistry};
use crate::resync::{DependentResync, ResyncOutcome, ResyncReport};

#[derive(Clone)]
pub struct Orchestrator {
    source: Arc<dyn SourceApi>,
    target: Arc<dyn TargetApi>,
    registry: Arc<JobRegistry>,
    page_size: usize,
    error_sample_cap: usize,
}

impl Orchestrator {
    pub fn new(
        source: Arc<dyn SourceApi>,
        target: Arc<dyn TargetApi>,
        registry: Arc<JobRegistry>,
        page_size: usize,
        error_sample_cap: usize,
    ) -> Self {
        Self {
            source,
            target,
            registry,
            page_size,
            error_sample_cap,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Start a full sync for one tenant as a detached task and return
    /// its job id immediately.
    pub fn start(&self, tenant_id: &str) -> Result<String, EngineError> {
        let steps = full_sync_step_order()?;
        let job = SyncJob::new(tenant_id);
        let job_id = job.job_id.clone();
        let handle = self.registry.register(job);
        let runner = self.clone();
        let tenant = tenant_id.to_string();
        tokio::spawn(async move {
            runner.run_job(handle, steps, tenant).await;
        });
        Ok(job_id)
    }

    /// Run a full sync to completion on the current task. Tests drive
    /// this directly; [`Orchestrator::start`] spawns it.
    pub async fn run_job(&self, handle: JobHandle, steps: Vec<EntityKind>, tenant_id: String) {
        {
            let mut job = lock_job(&handle);
            job.state = JobState::Running;
            tracing::info!(job_id = %job.job_id, tenant_id = %tenant_id, "full sync started");
        }

        let mut any_step_pulled = false;
        for kind in steps {
            lock_job(&handle).current_step = Some(kind);
            let (result, pulled) = self.run_step(kind, &tenant_id).await;
            any_step_pulled |= pulled;
            let mut job = lock_job(&handle);
            tracing::info!(
                job_id = %job.job_id,
                module = %kind,
                total = result.total,
                synced = result.synced,
                skipped = result.skipped,
                errors = result.errors,
                "step complete"
            );
            job.steps.push(result);
        }

        let mut job = lock_job(&handle);
        job.current_step = None;
        job.state = if any_step_pulled {
            JobState::Complete
        } else {
            JobState::Failed
        };
        job.finished_at = Some(chrono::Utc::now());
        tracing::info!(
            job_id = %job.job_id,
            state = ?job.state,
            errors = job.total_errors(),
            "full sync finished"
        );
    }

    /// Run one entity step. The bool is false only when the very first
    /// pull failed and no record was processed.
    async fn run_step(&self, kind: EntityKind, tenant_id: &str) -> (StepResult, bool) {
        let mut result = StepResult::new(kind);
        let mut page = 1usize;
        let mut pulled = false;

        loop {
            let fetched = self.source.fetch_page(kind, page, self.page_size).await;
            let source_page = match fetched {
                Ok(p) => p,
                Err(e) => {
                    let label = if e.is_transient() { " (transient)" } else { "" };
                    result.record_error(
                        format!("{kind}: source pull failed{label} on page {page}: {e}"),
                        self.error_sample_cap,
                    );
                    break;
                }
            };
            pulled = true;
            if source_page.records.is_empty() {
                break;
            }
            let has_more = source_page.has_more;
            for raw in source_page.records {
                result.total += 1;
                match CanonicalRecord::parse(kind, &raw) {
                    Ok(record) => self.push_record(&record, tenant_id, &mut result).await,
                    Err(msg) => {
                        let id = best_effort_id(&raw);
                        result.record_error(
                            format!("{kind}/{id}: unparseable source row: {msg}"),
                            self.error_sample_cap,
                        );
                    }
                }
            }
            if !has_more {
                break;
            }
            page += 1;
        }

        (result, pulled)
    }

    /// Push one record, repairing a missing parent at most once.
    async fn push_record(&self, record: &CanonicalRecord, tenant_id: &str, step: &mut StepResult) {
        let kind = record.kind();
        let id = record.external_id();
        match self.push_once(record).await {
            Ok(TargetOutcome::Ok) => step.synced += 1,
            Ok(TargetOutcome::DuplicateKey) => step.skipped += 1,
            Ok(TargetOutcome::ParentNotFound {
                parent_kind,
                parent_id,
            }) => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    child = %format_args!("{kind}/{id}"),
                    parent = %format_args!("{parent_kind}/{parent_id}"),
                    "missing parent on target, attempting repair"
                );
                if let Err(msg) = self.repair_parent(parent_kind, &parent_id).await {
                    step.record_error(format!("{kind}/{id}: {msg}"), self.error_sample_cap);
                    return;
                }
                match self.push_once(record).await {
                    Ok(TargetOutcome::Ok) => step.synced += 1,
                    Ok(TargetOutcome::DuplicateKey) => step.skipped += 1,
                    Ok(TargetOutcome::ParentNotFound { parent_id, .. }) => step.record_error(
                        format!("{kind}/{id}: parent {parent_id} still missing after repair"),
                        self.error_sample_cap,
                    ),
                    Ok(TargetOutcome::Failed { message }) => step
                        .record_error(format!("{kind}/{id}: {message}"), self.error_sample_cap),
                    Err(e) => {
                        step.record_error(format!("{kind}/{id}: {e}"), self.error_sample_cap)
                    }
                }
            }
            Ok(TargetOutcome::Failed { message }) => {
                step.record_error(format!("{kind}/{id}: {message}"), self.error_sample_cap)
            }
            Err(e) => step.record_error(format!("{kind}/{id}: {e}"), self.error_sample_cap),
        }
    }

    async fn push_once(
        &self,
        record: &CanonicalRecord,
    ) -> Result<TargetOutcome, recsync_core::errors::TargetError> {
        self.target
            .call(record.kind().target_function(), &record.target_payload())
            .await
    }

    /// Fetch a parent from the source and push it to the target.
    /// DuplicateKey is tolerated (another worker may have won the race).
    async fn repair_parent(&self, parent_kind: EntityKind, parent_id: &str) -> Result<(), String> {
        let raw = self
            .source
            .fetch_by_id(parent_kind, parent_id)
            .await
            .map_err(|e| format!("parent {parent_kind}/{parent_id} fetch failed: {e}"))?
            .ok_or_else(|| format!("parent {parent_kind}/{parent_id} not found on source"))?;
        let parent = CanonicalRecord::parse(parent_kind, &raw)
            .map_err(|msg| format!("parent {parent_kind}/{parent_id} unparseable: {msg}"))?;
        match self.push_once(&parent).await {
            Ok(TargetOutcome::Ok) | Ok(TargetOutcome::DuplicateKey) => Ok(()),
            Ok(TargetOutcome::ParentNotFound { parent_id: gp, .. }) => Err(format!(
                "parent {parent_kind}/{parent_id} itself missing parent {gp}"
            )),
            Ok(TargetOutcome::Failed { message }) => Err(format!(
                "parent {parent_kind}/{parent_id} push failed: {message}"
            )),
            Err(e) => Err(format!("parent {parent_kind}/{parent_id} push failed: {e}")),
        }
    }

    /// Resync one record and everything that references it.
    ///
    /// The anchor is fetched fresh from the source and pushed; every
    /// dependent kind is then searched by its ref field and each hit is
    /// pushed too. Dependent failures are reported individually.
    pub async fn resync(
        &self,
        kind: EntityKind,
        external_id: &str,
        tenant_id: &str,
    ) -> ResyncReport {
        let mut report = ResyncReport::new(kind, external_id);
        tracing::info!(tenant_id = %tenant_id, record = %format_args!("{kind}/{external_id}"), "resync requested");

        report.anchor = match self.source.fetch_by_id(kind, external_id).await {
            Ok(Some(raw)) => self.resync_one(kind, &raw, tenant_id).await,
            Ok(None) => ResyncOutcome::NotFound,
            Err(e) => ResyncOutcome::Error {
                message: format!("source fetch failed: {e}"),
            },
        };

        for (dep_kind, ref_field) in kind.dependents() {
            let hits = match self.source.search(dep_kind, ref_field, external_id).await {
                Ok(hits) => hits,
                Err(e) => {
                    report.dependents.push(DependentResync {
                        kind: dep_kind,
                        external_id: String::new(),
                        outcome: ResyncOutcome::Error {
                            message: format!("source search failed: {e}"),
                        },
                    });
                    continue;
                }
            };
            for raw in hits {
                let outcome = self.resync_one(dep_kind, &raw, tenant_id).await;
                report.dependents.push(DependentResync {
                    kind: dep_kind,
                    external_id: best_effort_id(&raw),
                    outcome,
                });
            }
        }

        report
    }

    async fn resync_one(
        &self,
        kind: EntityKind,
        raw: &serde_json::Value,
        tenant_id: &str,
    ) -> ResyncOutcome {
        let record = match CanonicalRecord::parse(kind, raw) {
            Ok(r) => r,
            Err(msg) => {
                return ResyncOutcome::Error {
                    message: format!("unparseable source row: {msg}"),
                }
            }
        };
        let mut step = StepResult::new(kind);
        self.push_record(&record, tenant_id, &mut step).await;
        if step.synced == 1 {
            ResyncOutcome::Synced
        } else if step.skipped == 1 {
            ResyncOutcome::Skipped
        } else {
            ResyncOutcome::Error {
                message: step
                    .error_samples
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "push failed".to_string()),
            }
        }
    }
}

fn best_effort_id(raw: &serde_json::Value) -> String {
    for key in ["id", "Id", "ID"] {
        match raw.get(key) {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    "?".to_string()
}
