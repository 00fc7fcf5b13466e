//! In-memory source for tests: seedable per-kind records, pagination
//! over the seeded order, and per-kind failure injection.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use recsync_core::entity::{CanonicalRecord, EntityKind};
use recsync_core::errors::SourceError;

use super::{SourceApi, SourcePage};

#[derive(Clone, Copy)]
enum FailureMode {
    Network,
    Auth,
}

#[derive(Default)]
struct MockState {
    records: HashMap<EntityKind, Vec<serde_json::Value>>,
    fail_kinds: HashMap<EntityKind, (FailureMode, String)>,
    field_updates: Vec<(EntityKind, String, serde_json::Value)>,
}

/// Scripted [`SourceApi`] implementation.
#[derive(Default)]
pub struct MockSourceClient {
    state: Mutex<MockState>,
}

impl MockSourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, kind: EntityKind, records: Vec<serde_json::Value>) {
        self.state
            .lock()
            .unwrap()
            .records
            .entry(kind)
            .or_default()
            .extend(records);
    }

    /// Make every fetch for `kind` fail with a network error.
    pub fn fail_kind(&self, kind: EntityKind, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_kinds
            .insert(kind, (FailureMode::Network, reason.to_string()));
    }

    /// Make every fetch for `kind` fail with an auth error.
    pub fn fail_kind_auth(&self, kind: EntityKind, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_kinds
            .insert(kind, (FailureMode::Auth, reason.to_string()));
    }

    /// Fields written back via `update_field`, in call order.
    pub fn recorded_updates(&self) -> Vec<(EntityKind, String, serde_json::Value)> {
        self.state.lock().unwrap().field_updates.clone()
    }

    fn check_failure(state: &MockState, kind: EntityKind) -> Result<(), SourceError> {
        if let Some((mode, reason)) = state.fail_kinds.get(&kind) {
            return Err(match mode {
                FailureMode::Network => SourceError::Network {
                    reason: reason.clone(),
                },
                FailureMode::Auth => SourceError::AuthFailed {
                    reason: reason.clone(),
                },
            });
        }
        Ok(())
    }

    fn matches_id(kind: EntityKind, raw: &serde_json::Value, id: &str) -> bool {
        CanonicalRecord::parse(kind, raw)
            .map(|r| r.external_id() == id)
            .unwrap_or(false)
    }
}

#[async_trait]
impl SourceApi for MockSourceClient {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        page: usize,
        page_size: usize,
    ) -> Result<SourcePage, SourceError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, kind)?;
        let all = state.records.get(&kind).cloned().unwrap_or_default();
        let start = page.saturating_sub(1) * page_size;
        let records: Vec<_> = all.iter().skip(start).take(page_size).cloned().collect();
        let has_more = start + records.len() < all.len();
        Ok(SourcePage { records, has_more })
    }

    async fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<serde_json::Value>, SourceError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, kind)?;
        Ok(state
            .records
            .get(&kind)
            .and_then(|all| all.iter().find(|r| Self::matches_id(kind, r, id)))
            .cloned())
    }

    async fn search(
        &self,
        kind: EntityKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<serde_json::Value>, SourceError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state, kind)?;
        let matches = state
            .records
            .get(&kind)
            .map(|all| {
                all.iter()
                    .filter(|r| {
                        r.get(field)
                            .map(|v| match v {
                                serde_json::Value::String(s) => s == value,
                                other => other.to_string() == value,
                            })
                            .unwrap_or(false)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn update_field(
        &self,
        kind: EntityKind,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<(), SourceError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state, kind)?;
        state
            .field_updates
            .push((kind, id.to_string(), fields.clone()));
        Ok(())
    }
}
