//! OAuth2 token management for the source client.
//!
//! Holds the long-lived refresh token from config and exchanges it for
//! short-lived access tokens, refreshing ahead of expiry so paginated
//! pulls never fail mid-collection on a stale token.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use recsync_core::config::SourceConfig;
use recsync_core::constants::TOKEN_REFRESH_MARGIN_SECS;
use recsync_core::errors::SourceError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Caches the current access token and refreshes it on demand.
pub struct TokenManager {
    config: SourceConfig,
    token: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            token: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, refreshing if absent or within the
    /// refresh margin of expiry.
    pub async fn bearer(&self, client: &reqwest::Client) -> Result<String, SourceError> {
        let mut guard = self.token.lock().await;
        let margin = Duration::from_secs(TOKEN_REFRESH_MARGIN_SECS);
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at.saturating_duration_since(Instant::now()) > margin {
                return Ok(cached.access_token.clone());
            }
        }

        tracing::debug!("refreshing source access token");
        let response = client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::AuthFailed {
                reason: format!("token endpoint unreachable: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::AuthFailed {
                reason: format!("token endpoint returned {status}: {body}"),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| SourceError::AuthFailed {
            reason: format!("malformed token response: {e}"),
        })?;

        let access_token = token.access_token.clone();
        *guard = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(access_token)
    }
}
