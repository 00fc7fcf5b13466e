//! # recsync-clients
//!
//! The two external collaborators, specified through traits so the
//! orchestrator and tests never care which side of the wire they are
//! on: [`SourceApi`] (paginated REST + OAuth2 refresh) and
//! [`TargetApi`] (RPC calls with a typed outcome instead of
//! string-matched exceptions).

pub mod source;
pub mod target;

pub use source::{HttpSourceClient, MockSourceClient, SourceApi, SourcePage};
pub use target::{HttpTargetClient, MockTargetClient, TargetApi, TargetOutcome};
