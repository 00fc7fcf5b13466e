//! Shared application state, built once in the binary and cloned into
//! every handler.

use std::sync::Arc;

use recsync_core::config::RecsyncConfig;
use recsync_core::traits::ILocalStore;
use recsync_engine::{BatchIngress, IdempotencyCache};
use recsync_jobs::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ILocalStore>,
    pub ingress: Arc<BatchIngress>,
    pub idempotency: Arc<IdempotencyCache>,
    pub orchestrator: Orchestrator,
    pub config: Arc<RecsyncConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ILocalStore>,
        idempotency: Arc<IdempotencyCache>,
        orchestrator: Orchestrator,
        config: RecsyncConfig,
    ) -> Self {
        Self {
            ingress: Arc::new(BatchIngress::new(store.clone())),
            store,
            idempotency,
            orchestrator,
            config: Arc::new(config),
        }
    }

    /// Tenant for a request, falling back to the configured default.
    pub fn tenant_or_default(&self, header: Option<&str>) -> String {
        match header {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => self.config.sync.default_tenant.clone(),
        }
    }
}
