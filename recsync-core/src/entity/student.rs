//! Student — no dependencies. Carries a target-assigned id once the
//! target system has created its own account for the student; that id
//! is stored but deliberately outside the fingerprint.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawStudent {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_string")]
    target_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
    pub status: Option<String>,
    /// Id assigned by the target system. Written through on updates but
    /// never part of the fingerprint: a change limited to this field
    /// reads as UNCHANGED.
    pub target_id: Option<String>,
}

impl SyncRecord for StudentRecord {
    const KIND: EntityKind = EntityKind::Student;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawStudent = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            name: raw.name,
            email: raw.email,
            status: raw.status,
            target_id: raw.target_id,
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
            ("status", self.status.clone()),
        ]
    }

    fn extra_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("target_id", self.target_id.clone())]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "name": self.name,
            "email": self.email,
            "status": self.status,
        })
    }
}
