//! Idempotency cache in front of batch ingress.
//!
//! Upstream systems retry webhook deliveries on timeout; an identical
//! body within the TTL window replays the previously serialized
//! response byte-for-byte instead of recomputing. Keys are blake3
//! request hashes (see `recsync_core::fingerprint::request_key`).
//! moka handles TTL expiry lazily, no background sweep needed.

use std::time::Duration;

use moka::sync::Cache;

/// Maps request-content hash → previously returned response body.
pub struct IdempotencyCache {
    cache: Cache<String, String>,
}

impl IdempotencyCache {
    /// Create a cache whose entries live for `ttl` from insertion.
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Previously cached response for this key, if not expired.
    pub fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }

    /// Record the response for this key. First write wins; replays
    /// within the TTL never overwrite.
    pub fn set(&self, key: String, response: String) {
        if self.cache.get(&key).is_none() {
            self.cache.insert(key, response);
        }
    }

    /// Number of live entries (approximate, per moka semantics).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_within_ttl() {
        let cache = IdempotencyCache::new(Duration::from_secs(60));
        cache.set("k1".to_string(), "response-a".to_string());
        assert_eq!(cache.get("k1").as_deref(), Some("response-a"));
    }

    #[test]
    fn miss_returns_none() {
        let cache = IdempotencyCache::new(Duration::from_secs(60));
        assert!(cache.get("absent").is_none());
    }

    #[test]
    fn expired_entry_behaves_as_absent() {
        let cache = IdempotencyCache::new(Duration::from_millis(20));
        cache.set("k1".to_string(), "response-a".to_string());
        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("k1").is_none());
    }

    #[test]
    fn first_write_wins() {
        let cache = IdempotencyCache::new(Duration::from_secs(60));
        cache.set("k1".to_string(), "first".to_string());
        cache.set("k1".to_string(), "second".to_string());
        assert_eq!(cache.get("k1").as_deref(), Some("first"));
    }
}
