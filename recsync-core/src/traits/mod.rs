//! Capability seams implemented by the infrastructure crates.

mod store;

pub use store::ILocalStore;
