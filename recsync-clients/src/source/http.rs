//! reqwest-backed source client. Every request carries the per-request
//! timeout from config; a timeout surfaces as a transient
//! `SourceError::Network` scoped to that one page or record.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use recsync_core::config::SourceConfig;
use recsync_core::entity::EntityKind;
use recsync_core::errors::SourceError;

use super::auth::TokenManager;
use super::{SourceApi, SourcePage};

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(default)]
    data: Vec<serde_json::Value>,
    #[serde(default)]
    more: bool,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// HTTP client for the source system's REST API.
pub struct HttpSourceClient {
    config: SourceConfig,
    client: reqwest::Client,
    tokens: TokenManager,
}

impl HttpSourceClient {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network {
                reason: format!("client construction failed: {e}"),
            })?;
        let tokens = TokenManager::new(config.clone());
        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_authed(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        let token = self.tokens.bearer(&self.client).await?;
        self.client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SourceError::Network {
                reason: e.to_string(),
            })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Http {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SourceApi for HttpSourceClient {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        page: usize,
        page_size: usize,
    ) -> Result<SourcePage, SourceError> {
        let url = self.url(&format!(
            "/api/{}?page={page}&per_page={page_size}",
            kind.table()
        ));
        let response = check_status(self.get_authed(&url).await?).await?;
        let envelope: PageEnvelope =
            response.json().await.map_err(|e| SourceError::BadResponse {
                reason: format!("page envelope: {e}"),
            })?;
        Ok(SourcePage {
            records: envelope.data,
            has_more: envelope.more,
        })
    }

    async fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<serde_json::Value>, SourceError> {
        let url = self.url(&format!("/api/{}/{id}", kind.table()));
        let response = self.get_authed(&url).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let record = response.json().await.map_err(|e| SourceError::BadResponse {
            reason: format!("record body: {e}"),
        })?;
        Ok(Some(record))
    }

    async fn search(
        &self,
        kind: EntityKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<serde_json::Value>, SourceError> {
        let url = self.url(&format!(
            "/api/{}/search?field={field}&value={value}",
            kind.table()
        ));
        let response = check_status(self.get_authed(&url).await?).await?;
        let envelope: ListEnvelope =
            response.json().await.map_err(|e| SourceError::BadResponse {
                reason: format!("search envelope: {e}"),
            })?;
        Ok(envelope.data)
    }

    async fn update_field(
        &self,
        kind: EntityKind,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<(), SourceError> {
        let url = self.url(&format!("/api/{}/{id}", kind.table()));
        let token = self.tokens.bearer(&self.client).await?;
        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(fields)
            .send()
            .await
            .map_err(|e| SourceError::Network {
                reason: e.to_string(),
            })?;
        check_status(response).await?;
        Ok(())
    }
}
