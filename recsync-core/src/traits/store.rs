use crate::entity::{EntityKind, LocalRecord};
use crate::errors::RecsyncResult;

/// The local materialized view, addressed by (tenant, external id).
///
/// One row per external record per entity kind. The sync path inserts
/// and updates; it never deletes. `exists` is the read-only dependency
/// check and must not write.
pub trait ILocalStore: Send + Sync {
    fn get(
        &self,
        kind: EntityKind,
        tenant_id: &str,
        external_id: &str,
    ) -> RecsyncResult<Option<LocalRecord>>;

    fn exists(&self, kind: EntityKind, tenant_id: &str, external_id: &str)
        -> RecsyncResult<bool>;

    fn insert(&self, record: &LocalRecord) -> RecsyncResult<()>;

    fn update(&self, record: &LocalRecord) -> RecsyncResult<()>;

    fn count(&self, kind: EntityKind, tenant_id: &str) -> RecsyncResult<usize>;

    /// Cheap liveness probe for health reporting.
    fn ping(&self) -> RecsyncResult<()>;
}
