use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Source-system client configuration (OAuth2 + pagination).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the source system's REST API.
    pub base_url: String,
    /// OAuth2 token endpoint.
    pub token_url: String,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// OAuth2 refresh token (the grant recsync holds long-term).
    pub refresh_token: String,
    /// Records requested per page during full pulls.
    pub page_size: usize,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_SOURCE_BASE_URL.to_string(),
            token_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            page_size: constants::DEFAULT_PAGE_SIZE,
            timeout_secs: constants::DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}
