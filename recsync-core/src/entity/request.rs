//! Request — a student-raised support/change request; references the
//! student. Last full-sync step.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(deserialize_with = "flexible_string")]
    student_id: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub external_id: String,
    pub student_id: String,
    pub subject: Option<String>,
    pub status: Option<String>,
}

impl SyncRecord for RequestRecord {
    const KIND: EntityKind = EntityKind::Request;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawRequest = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            student_id: raw.student_id,
            subject: raw.subject,
            status: raw.status,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("student_id", &self.student_id)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        vec![LookupRef::new(EntityKind::Student, self.student_id.clone())]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("student_id", Some(self.student_id.clone())),
            ("subject", self.subject.clone()),
            ("status", self.status.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "student_id": self.student_id,
            "subject": self.subject,
            "status": self.status,
        })
    }
}
