//! recsyncd — the sync engine daemon.
//!
//! Loads config, opens the local store, wires the clients and
//! orchestrator, and serves the HTTP surface until shutdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use recsync_api::{build_router, AppState};
use recsync_clients::{HttpSourceClient, HttpTargetClient};
use recsync_core::config::RecsyncConfig;
use recsync_engine::IdempotencyCache;
use recsync_jobs::{JobRegistry, Orchestrator};
use recsync_storage::StorageEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path =
        std::env::var("RECSYNC_CONFIG").unwrap_or_else(|_| "recsync.toml".to_string());
    let mut config = RecsyncConfig::load_or_default(Path::new(&config_path))?;
    config.apply_env_overrides();
    tracing::info!(config_path, "configuration loaded");

    let store = Arc::new(
        StorageEngine::open(
            Path::new(&config.storage.db_path),
            config.storage.read_pool_size,
        )
        .context("opening local store")?,
    );

    let source = Arc::new(HttpSourceClient::new(config.source.clone()).context("source client")?);
    let target = Arc::new(HttpTargetClient::new(config.target.clone()).context("target client")?);

    let registry = Arc::new(JobRegistry::new());
    let orchestrator = Orchestrator::new(
        source,
        target,
        registry,
        config.source.page_size,
        config.sync.step_error_sample_cap,
    );
    let idempotency = Arc::new(IdempotencyCache::new(Duration::from_secs(
        config.sync.idempotency_ttl_secs,
    )));

    let bind = config.api.bind_address();
    let state = AppState::new(store, idempotency, orchestrator, config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(%bind, "recsyncd listening");
    axum::serve(listener, router).await?;
    Ok(())
}
