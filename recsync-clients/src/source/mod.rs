//! Source-system client: paginated fetch, by-id fetch, criteria search,
//! field update.

mod auth;
mod http;
mod mock;

pub use auth::TokenManager;
pub use http::HttpSourceClient;
pub use mock::MockSourceClient;

use async_trait::async_trait;

use recsync_core::entity::EntityKind;
use recsync_core::errors::SourceError;

/// One page of raw records from the source.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub records: Vec<serde_json::Value>,
    pub has_more: bool,
}

/// The minimal surface the sync core needs from the source system.
#[async_trait]
pub trait SourceApi: Send + Sync {
    /// Fetch page `page` (1-based) of the full collection for a kind.
    async fn fetch_page(
        &self,
        kind: EntityKind,
        page: usize,
        page_size: usize,
    ) -> Result<SourcePage, SourceError>;

    /// Fetch a single record by external id. `None` when not found.
    async fn fetch_by_id(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<serde_json::Value>, SourceError>;

    /// Criteria search: all records whose `field` equals `value`.
    async fn search(
        &self,
        kind: EntityKind,
        field: &str,
        value: &str,
    ) -> Result<Vec<serde_json::Value>, SourceError>;

    /// Write a set of fields back onto one source record.
    async fn update_field(
        &self,
        kind: EntityKind,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<(), SourceError>;
}
