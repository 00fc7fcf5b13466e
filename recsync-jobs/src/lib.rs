//! # recsync-jobs
//!
//! The full-sync orchestrator. A job walks the derived entity step
//! order, pulls every page from the source, transforms each row, and
//! pushes it to the target, repairing missing parents along the way.
//! Jobs run as detached tokio tasks and publish their progress through
//! a shared registry so status polls never block a running sync.

pub mod job;
pub mod orchestrator;
pub mod registry;
pub mod resync;

pub use job::{JobState, StepResult, SyncJob};
pub use orchestrator::Orchestrator;
pub use registry::JobRegistry;
pub use resync::{DependentResync, ResyncOutcome, ResyncReport};
