//! Stable change-detection fingerprint.
//!
//! The fingerprint covers an explicit, ordered subset of each entity's
//! attributes (never identifiers, never timestamps). Each field is
//! trimmed and lowercased before hashing so cosmetic upstream edits do
//! not register as changes, and `None` hashes identically to an empty
//! string.

use crate::constants::FINGERPRINT_SEPARATOR;

/// Normalize one field value for fingerprinting.
fn normalize(value: &Option<String>) -> String {
    match value {
        Some(v) => v.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Compute the fingerprint over an ordered list of `(name, value)` fields.
///
/// Field names are not hashed; only the ordered values are. The caller
/// (each entity's `fingerprint_fields`) owns the ordering contract.
/// Deterministic, infallible, no side effects.
pub fn fingerprint_fields(fields: &[(&'static str, Option<String>)]) -> String {
    let mut joined = String::new();
    for (i, (_, value)) in fields.iter().enumerate() {
        if i > 0 {
            joined.push(FINGERPRINT_SEPARATOR);
        }
        joined.push_str(&normalize(value));
    }
    blake3::hash(joined.as_bytes()).to_hex().to_string()
}

/// Hash an entire request body into an idempotency key.
///
/// Scoped by tenant and entity path so the same body replayed against a
/// different tenant or entity never collides. 256-bit blake3, hex.
pub fn request_key(tenant_id: &str, scope: &str, body: &[u8]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(tenant_id.as_bytes());
    hasher.update(&[0x1f]);
    hasher.update(scope.as_bytes());
    hasher.update(&[0x1f]);
    hasher.update(body);
    hasher.finalize().to_hex().to_string()
}
