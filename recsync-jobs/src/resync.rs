//! Per-record resync report types.

use serde::Serialize;

use recsync_core::entity::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ResyncOutcome {
    Synced,
    /// The target already holds an identical record.
    Skipped,
    /// The record no longer exists on the source.
    NotFound,
    Error { message: String },
}

/// One dependent record touched by a resync cascade.
#[derive(Debug, Clone, Serialize)]
pub struct DependentResync {
    pub kind: EntityKind,
    pub external_id: String,
    pub outcome: ResyncOutcome,
}

/// Report for `resync(kind, external_id)`: the anchor push plus every
/// dependent pushed by the cascade.
#[derive(Debug, Clone, Serialize)]
pub struct ResyncReport {
    pub kind: EntityKind,
    pub external_id: String,
    pub anchor: ResyncOutcome,
    pub dependents: Vec<DependentResync>,
}

impl ResyncReport {
    pub fn new(kind: EntityKind, external_id: &str) -> Self {
        Self {
            kind,
            external_id: external_id.to_string(),
            anchor: ResyncOutcome::NotFound,
            dependents: Vec::new(),
        }
    }
}
