//! Sync decisions — the ephemeral result contract every caller depends on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Before/after values for one changed field.
pub type FieldChange = (Option<String>, Option<String>);

/// Outcome of one sync call for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncOutcome {
    /// No local row existed; one was created.
    New,
    /// Fingerprint matched the stored row; nothing written.
    Unchanged,
    /// Fingerprint differed; changed fields were applied.
    Updated,
    /// Payload structurally unusable; nothing written.
    Invalid,
    /// A dependency is not synced yet; retryable later, nothing written.
    Skipped,
    /// A fault during this record only; the batch continued.
    Error,
}

impl SyncOutcome {
    /// Parse the uppercase wire/storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(SyncOutcome::New),
            "UNCHANGED" => Some(SyncOutcome::Unchanged),
            "UPDATED" => Some(SyncOutcome::Updated),
            "INVALID" => Some(SyncOutcome::Invalid),
            "SKIPPED" => Some(SyncOutcome::Skipped),
            "ERROR" => Some(SyncOutcome::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::New => "NEW",
            SyncOutcome::Unchanged => "UNCHANGED",
            SyncOutcome::Updated => "UPDATED",
            SyncOutcome::Invalid => "INVALID",
            SyncOutcome::Skipped => "SKIPPED",
            SyncOutcome::Error => "ERROR",
        }
    }
}

/// The decision record returned for every synced record.
///
/// `changes` is populated only for [`SyncOutcome::Updated`]; `reason`
/// only for [`SyncOutcome::Skipped`] (machine-readable, e.g.
/// `"student_not_synced_yet"`). BTreeMap keeps serialization stable so
/// idempotent replays are byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncDecision {
    pub external_id: String,
    pub status: SyncOutcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<String, FieldChange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SyncDecision {
    pub fn created(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            status: SyncOutcome::New,
            message: "record created".to_string(),
            changes: None,
            reason: None,
        }
    }

    pub fn unchanged(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            status: SyncOutcome::Unchanged,
            message: "no change detected".to_string(),
            changes: None,
            reason: None,
        }
    }

    pub fn updated(
        external_id: impl Into<String>,
        changes: BTreeMap<String, FieldChange>,
    ) -> Self {
        let n = changes.len();
        Self {
            external_id: external_id.into(),
            status: SyncOutcome::Updated,
            message: format!("{n} field(s) updated"),
            changes: Some(changes),
            reason: None,
        }
    }

    pub fn invalid(external_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            status: SyncOutcome::Invalid,
            message: message.into(),
            changes: None,
            reason: None,
        }
    }

    pub fn skipped(external_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            external_id: external_id.into(),
            status: SyncOutcome::Skipped,
            message: format!("dependency missing: {reason}"),
            changes: None,
            reason: Some(reason),
        }
    }

    pub fn errored(external_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            status: SyncOutcome::Error,
            message: message.into(),
            changes: None,
            reason: None,
        }
    }
}

/// Aggregate counts for one ingested batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestCounts {
    pub total: usize,
    pub new: usize,
    pub unchanged: usize,
    pub updated: usize,
    pub invalid: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl IngestCounts {
    /// Fold one decision into the counts.
    pub fn observe(&mut self, decision: &SyncDecision) {
        self.total += 1;
        match decision.status {
            SyncOutcome::New => self.new += 1,
            SyncOutcome::Unchanged => self.unchanged += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Invalid => self.invalid += 1,
            SyncOutcome::Skipped => self.skipped += 1,
            SyncOutcome::Error => self.errors += 1,
        }
    }
}

/// Full result of one batch ingest call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub counts: IngestCounts,
    pub results: Vec<SyncDecision>,
}

impl IngestReport {
    pub fn push(&mut self, decision: SyncDecision) {
        self.counts.observe(&decision);
        self.results.push(decision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&SyncOutcome::New).unwrap(),
            "\"NEW\""
        );
        assert_eq!(
            serde_json::to_string(&SyncOutcome::Skipped).unwrap(),
            "\"SKIPPED\""
        );
    }

    #[test]
    fn skipped_carries_reason() {
        let d = SyncDecision::skipped("e1", "student_not_synced_yet");
        assert_eq!(d.reason.as_deref(), Some("student_not_synced_yet"));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["reason"], "student_not_synced_yet");
        assert!(json.get("changes").is_none());
    }

    #[test]
    fn counts_observe_every_outcome() {
        let mut counts = IngestCounts::default();
        counts.observe(&SyncDecision::created("a"));
        counts.observe(&SyncDecision::unchanged("b"));
        counts.observe(&SyncDecision::invalid("c", "bad"));
        counts.observe(&SyncDecision::skipped("d", "x_not_synced_yet"));
        counts.observe(&SyncDecision::errored("e", "boom"));
        assert_eq!(counts.total, 5);
        assert_eq!(counts.new, 1);
        assert_eq!(counts.unchanged, 1);
        assert_eq!(counts.invalid, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.errors, 1);
    }
}
