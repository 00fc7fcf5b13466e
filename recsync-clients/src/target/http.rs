//! reqwest-backed target client. RPC shape: `POST {base}/rpc/{function}`
//! with a bearer token. Business rejections come back as 409/422 with a
//! JSON envelope carrying a stable `code`; those map to
//! [`TargetOutcome`] variants so callers never inspect message text.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use recsync_core::config::TargetConfig;
use recsync_core::entity::EntityKind;
use recsync_core::errors::TargetError;

use super::{TargetApi, TargetOutcome};

#[derive(Debug, Deserialize)]
struct RejectionEnvelope {
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    parent_type: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
}

/// HTTP client for the target system's RPC API.
pub struct HttpTargetClient {
    config: TargetConfig,
    client: reqwest::Client,
}

impl HttpTargetClient {
    pub fn new(config: TargetConfig) -> Result<Self, TargetError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TargetError::Network {
                reason: format!("client construction failed: {e}"),
            })?;
        Ok(Self { config, client })
    }

    fn classify(envelope: RejectionEnvelope) -> Result<TargetOutcome, TargetError> {
        match envelope.code.as_str() {
            "duplicate_key" => Ok(TargetOutcome::DuplicateKey),
            "parent_not_found" => {
                let parent_type =
                    envelope
                        .parent_type
                        .as_deref()
                        .ok_or_else(|| TargetError::BadEnvelope {
                            reason: "parent_not_found without parent_type".to_string(),
                        })?;
                let parent_id =
                    envelope
                        .parent_id
                        .clone()
                        .ok_or_else(|| TargetError::BadEnvelope {
                            reason: "parent_not_found without parent_id".to_string(),
                        })?;
                let parent_kind =
                    EntityKind::parse(parent_type).map_err(|_| TargetError::BadEnvelope {
                        reason: format!("unknown parent_type {parent_type:?}"),
                    })?;
                Ok(TargetOutcome::ParentNotFound {
                    parent_kind,
                    parent_id,
                })
            }
            _ => Ok(TargetOutcome::Failed {
                message: if envelope.message.is_empty() {
                    envelope.code
                } else {
                    format!("{}: {}", envelope.code, envelope.message)
                },
            }),
        }
    }
}

#[async_trait]
impl TargetApi for HttpTargetClient {
    async fn call(
        &self,
        function: &str,
        payload: &serde_json::Value,
    ) -> Result<TargetOutcome, TargetError> {
        let url = format!("{}/rpc/{function}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| TargetError::Network {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(TargetOutcome::Ok);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let envelope: RejectionEnvelope =
                serde_json::from_str(&body).map_err(|e| TargetError::BadEnvelope {
                    reason: format!("rejection body for {function}: {e}"),
                })?;
            return Self::classify(envelope);
        }

        Err(TargetError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_code_maps_to_outcome() {
        let envelope = RejectionEnvelope {
            code: "duplicate_key".to_string(),
            message: String::new(),
            parent_type: None,
            parent_id: None,
        };
        assert_eq!(
            HttpTargetClient::classify(envelope).unwrap(),
            TargetOutcome::DuplicateKey
        );
    }

    #[test]
    fn parent_not_found_carries_typed_parent() {
        let envelope = RejectionEnvelope {
            code: "parent_not_found".to_string(),
            message: String::new(),
            parent_type: Some("student".to_string()),
            parent_id: Some("S-77".to_string()),
        };
        assert_eq!(
            HttpTargetClient::classify(envelope).unwrap(),
            TargetOutcome::ParentNotFound {
                parent_kind: EntityKind::Student,
                parent_id: "S-77".to_string(),
            }
        );
    }

    #[test]
    fn parent_not_found_without_parent_fields_is_bad_envelope() {
        let envelope = RejectionEnvelope {
            code: "parent_not_found".to_string(),
            message: String::new(),
            parent_type: None,
            parent_id: None,
        };
        assert!(matches!(
            HttpTargetClient::classify(envelope),
            Err(TargetError::BadEnvelope { .. })
        ));
    }

    #[test]
    fn unknown_code_becomes_failed_with_message() {
        let envelope = RejectionEnvelope {
            code: "validation_error".to_string(),
            message: "date out of range".to_string(),
            parent_type: None,
            parent_id: None,
        };
        assert_eq!(
            HttpTargetClient::classify(envelope).unwrap(),
            TargetOutcome::Failed {
                message: "validation_error: date out of range".to_string(),
            }
        );
    }
}
