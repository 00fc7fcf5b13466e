use serde::{Deserialize, Serialize};

use crate::constants;

/// Sync-engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tenant used when a request carries no tenant header.
    pub default_tenant: String,
    /// Idempotency cache entry lifetime (seconds).
    pub idempotency_ttl_secs: u64,
    /// Cap on verbatim per-record error samples kept per full-sync step.
    pub step_error_sample_cap: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_tenant: constants::DEFAULT_TENANT.to_string(),
            idempotency_ttl_secs: constants::DEFAULT_IDEMPOTENCY_TTL_SECS,
            step_error_sample_cap: constants::STEP_ERROR_SAMPLE_CAP,
        }
    }
}
