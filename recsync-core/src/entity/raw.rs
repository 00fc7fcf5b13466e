//! Shared helpers for strict raw-payload parsing.
//!
//! Source systems are loose about scalar types (ids and amounts arrive
//! as strings or numbers depending on the emitting module), so id-like
//! fields accept both and normalize to `String`. Everything else is
//! strict: a missing mandatory field or a wrong type fails the record.

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;

/// Parse a raw JSON payload into a typed raw struct with a readable
/// error message.
pub(crate) fn parse_as<T: serde::de::DeserializeOwned>(
    raw: &serde_json::Value,
) -> Result<T, String> {
    serde_json::from_value(raw.clone()).map_err(|e| format!("invalid payload: {e}"))
}

/// Accept a JSON string or number, normalize to `String`.
pub(crate) fn flexible_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(DeError::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Optional variant of [`flexible_string`]. JSON `null` maps to `None`.
pub(crate) fn opt_flexible_string<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(DeError::custom(format!(
            "expected string, number, or null, got {other}"
        ))),
    }
}

/// Blank-string check shared by the `validate` impls.
pub(crate) fn require_nonblank(field: &'static str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("missing mandatory field: {field}"))
    } else {
        Ok(())
    }
}
