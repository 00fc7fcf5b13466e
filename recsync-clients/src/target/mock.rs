//! Scripted target for tests. Outcomes are queued per function name;
//! every call is logged so tests can assert push order and retries.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use recsync_core::errors::TargetError;

use super::{TargetApi, TargetOutcome};

#[derive(Default)]
struct MockState {
    scripted: HashMap<String, VecDeque<Result<TargetOutcome, TargetError>>>,
    calls: Vec<(String, serde_json::Value)>,
}

/// Scripted [`TargetApi`] implementation.
///
/// Calls with no script default to [`TargetOutcome::Ok`], so tests only
/// script the interesting pushes.
#[derive(Default)]
pub struct MockTargetClient {
    state: Mutex<MockState>,
}

impl MockTargetClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next unscripted call of `function`.
    pub fn script(&self, function: &str, outcome: TargetOutcome) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(function.to_string())
            .or_default()
            .push_back(Ok(outcome));
    }

    /// Queue a transport-level failure for the next call of `function`.
    pub fn script_error(&self, function: &str, error: TargetError) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(function.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// Every call made so far, as `(function, payload)` in order.
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of calls made to one function.
    pub fn call_count(&self, function: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(f, _)| f == function)
            .count()
    }
}

#[async_trait]
impl TargetApi for MockTargetClient {
    async fn call(
        &self,
        function: &str,
        payload: &serde_json::Value,
    ) -> Result<TargetOutcome, TargetError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((function.to_string(), payload.clone()));
        match state
            .scripted
            .get_mut(function)
            .and_then(|queue| queue.pop_front())
        {
            Some(outcome) => outcome,
            None => Ok(TargetOutcome::Ok),
        }
    }
}
