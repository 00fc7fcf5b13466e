//! Error taxonomy, layered per domain like the rest of the workspace:
//! each subsystem gets its own enum, unified under [`RecsyncError`].

mod engine_error;
mod source_error;
mod storage_error;
mod target_error;

pub use engine_error::EngineError;
pub use source_error::SourceError;
pub use storage_error::StorageError;
pub use target_error::TargetError;

/// Top-level error for the recsync workspace.
#[derive(Debug, thiserror::Error)]
pub enum RecsyncError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result alias used across the workspace.
pub type RecsyncResult<T> = Result<T, RecsyncError>;
