//! # recsync-engine
//!
//! The per-record sync core: decides NEW/UNCHANGED/UPDATED/INVALID/
//! SKIPPED against the local store, applies the single write, and
//! aggregates batch results. Also owns the idempotency cache that sits
//! in front of batch ingress.

pub mod idempotency;
pub mod ingress;
pub mod resolver;
pub mod syncer;

pub use idempotency::IdempotencyCache;
pub use ingress::BatchIngress;
pub use resolver::DependencyResolver;
pub use syncer::SyncService;
