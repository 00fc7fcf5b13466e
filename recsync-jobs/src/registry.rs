//! Concurrent job registry. Constructed once at startup and injected
//! wherever jobs are started or polled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use dashmap::DashMap;

use recsync_core::errors::EngineError;

use crate::job::SyncJob;

/// Shared handle to one job. The runner mutates the job under this
/// lock; polls clone a snapshot out from under it.
pub type JobHandle = Arc<Mutex<SyncJob>>;

/// Lock a job handle, recovering from poison. A panicked runner leaves
/// the job data intact up to its last completed write, which is still a
/// valid snapshot; propagating the poison would take polling down with
/// it.
pub(crate) fn lock_job(handle: &JobHandle) -> MutexGuard<'_, SyncJob> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct JobRegistry {
    jobs: DashMap<String, JobHandle>,
    latest_by_tenant: DashMap<String, String>,
    latest: RwLock<Option<String>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created job and mark it as the latest, both
    /// globally and for its tenant.
    pub fn register(&self, job: SyncJob) -> JobHandle {
        let job_id = job.job_id.clone();
        let tenant_id = job.tenant_id.clone();
        let handle = Arc::new(Mutex::new(job));
        self.jobs.insert(job_id.clone(), handle.clone());
        self.latest_by_tenant.insert(tenant_id, job_id.clone());
        *self
            .latest
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(job_id);
        handle
    }

    /// Snapshot one job by id.
    pub fn snapshot(&self, job_id: &str) -> Result<SyncJob, EngineError> {
        self.jobs
            .get(job_id)
            .map(|handle| lock_job(&handle).clone())
            .ok_or_else(|| EngineError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    /// Snapshot the most recently started job, if any.
    pub fn latest_snapshot(&self) -> Option<SyncJob> {
        let job_id = self
            .latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;
        self.snapshot(&job_id).ok()
    }

    /// Snapshot the most recently started job for one tenant.
    pub fn latest_for_tenant(&self, tenant_id: &str) -> Option<SyncJob> {
        let job_id = self.latest_by_tenant.get(tenant_id)?.clone();
        self.snapshot(&job_id).ok()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobState;

    #[test]
    fn unknown_job_id_is_not_found() {
        let registry = JobRegistry::new();
        assert!(matches!(
            registry.snapshot("nope"),
            Err(EngineError::JobNotFound { .. })
        ));
        assert!(registry.latest_snapshot().is_none());
    }

    #[test]
    fn latest_pointers_track_registration_order() {
        let registry = JobRegistry::new();
        let first = SyncJob::new("alpha");
        let first_id = first.job_id.clone();
        registry.register(first);
        let second = SyncJob::new("beta");
        let second_id = second.job_id.clone();
        registry.register(second);

        assert_eq!(registry.latest_snapshot().unwrap().job_id, second_id);
        assert_eq!(
            registry.latest_for_tenant("alpha").unwrap().job_id,
            first_id
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn snapshot_survives_a_poisoned_job_lock() {
        let registry = JobRegistry::new();
        let job = SyncJob::new("default");
        let job_id = job.job_id.clone();
        let handle = registry.register(job);

        handle.lock().unwrap().state = JobState::Running;
        let poisoner = handle.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("runner died mid-step");
        })
        .join();
        assert!(handle.is_poisoned());

        let snapshot = registry.snapshot(&job_id).unwrap();
        assert_eq!(snapshot.state, JobState::Running);
        assert_eq!(registry.latest_snapshot().unwrap().job_id, job_id);
    }

    #[test]
    fn snapshot_reflects_mutation_through_handle() {
        let registry = JobRegistry::new();
        let job = SyncJob::new("default");
        let job_id = job.job_id.clone();
        let handle = registry.register(job);

        handle.lock().unwrap().state = JobState::Running;
        assert_eq!(registry.snapshot(&job_id).unwrap().state, JobState::Running);
    }
}
