//! # recsync-api
//!
//! The HTTP surface over the sync engine: webhook-style batch ingress
//! with idempotent replay, full-sync job control, per-record resync,
//! and a health probe. All state is constructed at startup and injected
//! into handlers through [`AppState`].

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
