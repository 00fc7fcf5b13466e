//! Unit — one teaching unit inside a class; references it. Ingress-only.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawUnit {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(deserialize_with = "flexible_string")]
    class_id: String,
    name: String,
    #[serde(default, deserialize_with = "opt_flexible_string")]
    sequence: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitRecord {
    pub external_id: String,
    pub class_id: String,
    pub name: String,
    pub sequence: Option<String>,
}

impl SyncRecord for UnitRecord {
    const KIND: EntityKind = EntityKind::Unit;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawUnit = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            class_id: raw.class_id,
            name: raw.name,
            sequence: raw.sequence,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("class_id", &self.class_id)?;
        require_nonblank("name", &self.name)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        vec![LookupRef::new(EntityKind::Class, self.class_id.clone())]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("class_id", Some(self.class_id.clone())),
            ("name", Some(self.name.clone())),
            ("sequence", self.sequence.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "class_id": self.class_id,
            "name": self.name,
            "sequence": self.sequence,
        })
    }
}
