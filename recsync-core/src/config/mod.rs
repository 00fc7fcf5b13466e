//! Per-subsystem configuration structs, aggregated by [`RecsyncConfig`].
//!
//! Every section deserializes with `#[serde(default)]` so a partial TOML
//! file (or none at all) yields a working configuration.

mod api_config;
mod defaults;
mod source_config;
mod storage_config;
mod sync_config;
mod target_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use api_config::ApiConfig;
pub use source_config::SourceConfig;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;
pub use target_config::TargetConfig;

use crate::errors::{RecsyncError, RecsyncResult};

/// Full recsync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecsyncConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub sync: SyncConfig,
}

impl RecsyncConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> RecsyncResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RecsyncError::Config {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| RecsyncError::Config {
            reason: format!("cannot parse {}: {e}", path.display()),
        })?;
        tracing::debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Load from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> RecsyncResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Override deployment secrets from the environment, so credential
    /// values never have to live in the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("RECSYNC_SOURCE_CLIENT_SECRET") {
            self.source.client_secret = v;
        }
        if let Ok(v) = std::env::var("RECSYNC_SOURCE_REFRESH_TOKEN") {
            self.source.refresh_token = v;
        }
        if let Ok(v) = std::env::var("RECSYNC_TARGET_API_TOKEN") {
            self.target.api_token = v;
        }
        if let Ok(v) = std::env::var("RECSYNC_DB_PATH") {
            tracing::debug!(db_path = %v, "database path overridden from environment");
            self.storage.db_path = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = RecsyncConfig::default();
        assert_eq!(cfg.sync.default_tenant, "default");
        assert!(cfg.storage.read_pool_size >= 1);
        assert!(cfg.api.bind_address().contains(':'));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: RecsyncConfig = toml::from_str(
            r#"
            [api]
            port = 9000

            [source]
            base_url = "https://source.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.port, 9000);
        assert_eq!(cfg.source.base_url, "https://source.example.com");
        assert_eq!(cfg.sync.idempotency_ttl_secs, 3600);
    }

    #[test]
    fn load_reads_file_and_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recsync.toml");
        std::fs::write(&path, "[sync]\ndefault_tenant = \"acme\"\n").unwrap();

        let cfg = RecsyncConfig::load(&path).unwrap();
        assert_eq!(cfg.sync.default_tenant, "acme");

        let cfg = RecsyncConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.sync.default_tenant, "default");

        let err = RecsyncConfig::load(&dir.path().join("absent.toml"));
        assert!(err.is_err());
    }
}
