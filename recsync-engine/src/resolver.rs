//! Dependency resolver: read-only lookups of referenced entities.
//!
//! Referential integrity is enforced here, at the application layer,
//! because the source emits records out of dependency order (an
//! enrollment event can arrive before its student). A missing reference
//! is a SKIPPED outcome, not an error.

use std::sync::Arc;

use recsync_core::entity::LookupRef;
use recsync_core::errors::RecsyncResult;
use recsync_core::traits::ILocalStore;

/// Checks a record's foreign references against the local store.
pub struct DependencyResolver {
    store: Arc<dyn ILocalStore>,
}

impl DependencyResolver {
    pub fn new(store: Arc<dyn ILocalStore>) -> Self {
        Self { store }
    }

    /// Return the first unresolved reference, in declaration order, or
    /// `None` when every referenced entity exists for this tenant.
    pub fn first_missing(
        &self,
        tenant_id: &str,
        refs: &[LookupRef],
    ) -> RecsyncResult<Option<LookupRef>> {
        for r in refs {
            if !self.store.exists(r.kind, tenant_id, &r.external_id)? {
                return Ok(Some(r.clone()));
            }
        }
        Ok(None)
    }
}
