//! Full-sync job model. Jobs are in-memory only; a restart forgets
//! them, and a sync is safe to rerun because every push is an upsert.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recsync_core::entity::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Complete,
    Failed,
}

/// Result of one entity step within a full sync.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub module: EntityKind,
    pub total: usize,
    pub synced: usize,
    pub skipped: usize,
    pub errors: usize,
    /// First few verbatim error messages; `errors` keeps the real count.
    pub error_samples: Vec<String>,
}

impl StepResult {
    pub fn new(module: EntityKind) -> Self {
        Self {
            module,
            total: 0,
            synced: 0,
            skipped: 0,
            errors: 0,
            error_samples: Vec::new(),
        }
    }

    /// Record one per-record error, keeping at most `sample_cap` samples.
    pub fn record_error(&mut self, message: String, sample_cap: usize) {
        self.errors += 1;
        if self.error_samples.len() < sample_cap {
            self.error_samples.push(message);
        }
    }
}

/// One full-sync run. Snapshots of this struct are what status polls
/// serialize, so everything on it derives `Serialize`.
#[derive(Debug, Clone, Serialize)]
pub struct SyncJob {
    pub job_id: String,
    pub tenant_id: String,
    pub state: JobState,
    /// The step currently running, `None` before the first and after
    /// the last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<EntityKind>,
    pub steps: Vec<StepResult>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl SyncJob {
    pub fn new(tenant_id: &str) -> Self {
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            state: JobState::Pending,
            current_step: None,
            steps: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn total_synced(&self) -> usize {
        self.steps.iter().map(|s| s.synced).sum()
    }

    pub fn total_errors(&self) -> usize {
        self.steps.iter().map(|s| s.errors).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_samples_stay_capped_while_count_grows() {
        let mut step = StepResult::new(EntityKind::Payment);
        for i in 0..25 {
            step.record_error(format!("payment/P-{i}: rejected"), 10);
        }
        assert_eq!(step.errors, 25);
        assert_eq!(step.error_samples.len(), 10);
        assert_eq!(step.error_samples[0], "payment/P-0: rejected");
    }

    #[test]
    fn new_job_starts_pending_with_unique_id() {
        let a = SyncJob::new("default");
        let b = SyncJob::new("default");
        assert_eq!(a.state, JobState::Pending);
        assert!(a.steps.is_empty());
        assert_ne!(a.job_id, b.job_id);
    }
}
