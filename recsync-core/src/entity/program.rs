//! Program — a sellable course product. No dependencies; ingress-only.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

/// Raw source payload for a program. The source's product module emits
/// vendor-style field names (`Product_Name`, `Price`).
#[derive(Debug, Deserialize)]
struct RawProgram {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(rename = "Product_Name", alias = "name")]
    name: String,
    #[serde(
        rename = "Price",
        alias = "price",
        default,
        deserialize_with = "opt_flexible_string"
    )]
    price: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRecord {
    pub external_id: String,
    pub name: String,
    pub price: Option<String>,
    pub status: Option<String>,
}

impl SyncRecord for ProgramRecord {
    const KIND: EntityKind = EntityKind::Program;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawProgram = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            name: raw.name,
            price: raw.price,
            status: raw.status,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("name", &self.name)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        Vec::new()
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("price", self.price.clone()),
            ("status", self.status.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "name": self.name,
            "price": self.price,
            "status": self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vendor_field_names() {
        let raw = serde_json::json!({"id": "p1", "Product_Name": "Intro", "Price": "100"});
        let record = ProgramRecord::parse(&raw).unwrap();
        assert_eq!(record.external_id, "p1");
        assert_eq!(record.name, "Intro");
        assert_eq!(record.price.as_deref(), Some("100"));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn numeric_id_and_price_normalize() {
        let raw = serde_json::json!({"id": 7, "name": "Algebra", "price": 150});
        let record = ProgramRecord::parse(&raw).unwrap();
        assert_eq!(record.external_id, "7");
        assert_eq!(record.price.as_deref(), Some("150"));
    }

    #[test]
    fn missing_name_fails_parse() {
        let raw = serde_json::json!({"id": "p1"});
        assert!(ProgramRecord::parse(&raw).is_err());
    }

    #[test]
    fn blank_name_fails_validation() {
        let raw = serde_json::json!({"id": "p1", "name": "   "});
        let record = ProgramRecord::parse(&raw).unwrap();
        assert!(record.validate().is_err());
    }
}
