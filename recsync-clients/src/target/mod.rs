//! Target-system client: RPC calls whose failure modes are carried in
//! a typed outcome rather than matched out of error message text.

mod http;
mod mock;

pub use http::HttpTargetClient;
pub use mock::MockTargetClient;

use async_trait::async_trait;

use recsync_core::entity::EntityKind;
use recsync_core::errors::TargetError;

/// What the target said about one push.
///
/// A `Result::Err` means the call itself broke (network, transport,
/// malformed envelope); every business-level response, including the
/// expected failure modes, lands here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Upsert accepted.
    Ok,
    /// The target already holds this record under the same key.
    DuplicateKey,
    /// A referenced parent record is missing on the target side.
    ParentNotFound {
        parent_kind: EntityKind,
        parent_id: String,
    },
    /// The target rejected the record for any other reason.
    Failed { message: String },
}

/// The surface the orchestrator needs from the target system.
#[async_trait]
pub trait TargetApi: Send + Sync {
    /// Call one named RPC function with a JSON payload.
    async fn call(
        &self,
        function: &str,
        payload: &serde_json::Value,
    ) -> Result<TargetOutcome, TargetError>;
}
