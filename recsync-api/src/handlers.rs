//! Request handlers.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use recsync_core::entity::EntityKind;
use recsync_core::fingerprint::request_key;

use crate::error::ApiError;
use crate::state::AppState;

const TENANT_HEADER: &str = "x-tenant-id";

fn tenant_from(state: &AppState, headers: &HeaderMap) -> String {
    state.tenant_or_default(headers.get(TENANT_HEADER).and_then(|v| v.to_str().ok()))
}

fn json_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct IngestEnvelope {
    data: Vec<serde_json::Value>,
}

/// `POST /sync/:entity` — batch ingress with idempotent replay.
///
/// The idempotency key is computed over the raw body bytes before any
/// parsing, so a replayed request returns the cached response even when
/// the body would fail to parse today.
pub async fn sync_entity(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let kind = EntityKind::parse(&entity).map_err(|_| ApiError::UnknownEntity {
        name: entity.clone(),
    })?;
    let tenant_id = tenant_from(&state, &headers);
    let key = request_key(&tenant_id, &entity, &body);

    if let Some(cached) = state.idempotency.get(&key) {
        tracing::info!(%kind, tenant_id, idempotency_key = %key, "idempotent replay");
        return Ok(json_response(StatusCode::OK, cached));
    }

    let envelope: IngestEnvelope =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody {
            reason: e.to_string(),
        })?;

    let ingress = state.ingress.clone();
    let tenant = tenant_id.clone();
    let report = tokio::task::spawn_blocking(move || ingress.ingest(kind, &envelope.data, &tenant))
        .await
        .map_err(|e| ApiError::Internal {
            reason: format!("ingest task failed: {e}"),
        })?;

    let rendered = serde_json::to_string(&json!({
        "status": "success",
        "idempotency_key": key,
        "counts": report.counts,
        "results": report.results,
    }))
    .map_err(|e| ApiError::Internal {
        reason: format!("response serialization failed: {e}"),
    })?;

    state.idempotency.set(key, rendered.clone());
    Ok(json_response(StatusCode::OK, rendered))
}

/// `POST /admin/full-sync` — start a detached full sync, reply 202.
pub async fn full_sync_start(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let tenant_id = tenant_from(&state, &headers);
    let job_id = state
        .orchestrator
        .start(&tenant_id)
        .map_err(|e| ApiError::Internal {
            reason: e.to_string(),
        })?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "job_id": job_id,
            "status": "started",
            "poll_url": format!("/admin/full-sync/status?job_id={job_id}"),
        })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub job_id: Option<String>,
}

/// `GET /admin/full-sync/status` — snapshot one job, or the latest.
pub async fn full_sync_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registry = state.orchestrator.registry();
    let snapshot = match query.job_id {
        Some(job_id) => registry
            .snapshot(&job_id)
            .map_err(|_| ApiError::JobNotFound { job_id })?,
        None => registry.latest_snapshot().ok_or(ApiError::JobNotFound {
            job_id: "latest".to_string(),
        })?,
    };
    let mut body = serde_json::to_value(&snapshot).map_err(|e| ApiError::Internal {
        reason: format!("snapshot serialization failed: {e}"),
    })?;
    body["total_synced"] = json!(snapshot.total_synced());
    body["total_errors"] = json!(snapshot.total_errors());
    Ok(Json(body))
}

/// `POST /admin/resync/:entity/:id` — push one record and its
/// dependents to the target.
pub async fn resync_record(
    State(state): State<AppState>,
    Path((entity, external_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let kind = EntityKind::parse(&entity).map_err(|_| ApiError::UnknownEntity {
        name: entity.clone(),
    })?;
    let tenant_id = tenant_from(&state, &headers);
    let report = state
        .orchestrator
        .resync(kind, &external_id, &tenant_id)
        .await;
    Ok(Json(report).into_response())
}

/// `GET /health` — liveness plus a storage ping.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping() {
        Ok(()) => Json(json!({ "status": "ok", "storage": "ok" })).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "storage": e.to_string() })),
        )
            .into_response(),
    }
}
