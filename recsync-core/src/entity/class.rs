//! Class — references its teacher. Carries a target-assigned id kept
//! outside the fingerprint, like students.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawClass {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    name: String,
    #[serde(deserialize_with = "flexible_string")]
    teacher_id: String,
    #[serde(default)]
    teacher_name: Option<String>,
    #[serde(default)]
    schedule: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_string")]
    target_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassRecord {
    pub external_id: String,
    pub name: String,
    pub teacher_id: String,
    pub teacher_name: Option<String>,
    pub schedule: Option<String>,
    pub status: Option<String>,
    pub target_id: Option<String>,
}

impl SyncRecord for ClassRecord {
    const KIND: EntityKind = EntityKind::Class;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawClass = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            name: raw.name,
            teacher_id: raw.teacher_id,
            teacher_name: raw.teacher_name,
            schedule: raw.schedule,
            status: raw.status,
            target_id: raw.target_id,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("name", &self.name)?;
        require_nonblank("teacher_id", &self.teacher_id)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        vec![LookupRef {
            kind: EntityKind::Teacher,
            external_id: self.teacher_id.clone(),
            name: self.teacher_name.clone(),
        }]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("teacher_id", Some(self.teacher_id.clone())),
            ("schedule", self.schedule.clone()),
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
            "teacher_id": self.teacher_id,
            "schedule": self.schedule,
            "status": self.status,
        })
    }
}
