/// Sync-engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown entity type: {name}")]
    UnknownEntity { name: String },

    #[error("dependency cycle in entity graph: {detail}")]
    DependencyCycle { detail: String },

    #[error("job not found: {job_id}")]
    JobNotFound { job_id: String },
}
