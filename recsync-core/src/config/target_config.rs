use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Target-system client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the target system's RPC endpoint.
    pub base_url: String,
    /// Static bearer token for the target system.
    pub api_token: String,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_TARGET_BASE_URL.to_string(),
            api_token: String::new(),
            timeout_secs: constants::DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}
