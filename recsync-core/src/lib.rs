//! # recsync-core
//!
//! Foundation crate for the recsync reconciliation engine.
//! Defines the entity model, the fingerprint function, sync decisions,
//! errors, config, and constants. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod decision;
pub mod entity;
pub mod errors;
pub mod fingerprint;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RecsyncConfig;
pub use decision::{IngestCounts, IngestReport, SyncDecision, SyncOutcome};
pub use entity::{CanonicalRecord, EntityKind, LocalRecord, LookupRef, SyncRecord};
pub use errors::{RecsyncError, RecsyncResult};
pub use fingerprint::fingerprint_fields;
