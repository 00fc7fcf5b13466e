//! Teacher — no dependencies; first full-sync step.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawTeacher {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeacherRecord {
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
}

impl SyncRecord for TeacherRecord {
    const KIND: EntityKind = EntityKind::Teacher;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawTeacher = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            name: raw.name,
            email: raw.email,
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
            ("email", self.email.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "name": self.name,
            "email": self.email,
        })
    }
}
