//! Registration — a student's paid enrollment in a program; references
//! the student.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawRegistration {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(deserialize_with = "flexible_string")]
    student_id: String,
    #[serde(default)]
    student_name: Option<String>,
    #[serde(default)]
    program_name: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_string")]
    amount: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRecord {
    pub external_id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub program_name: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl SyncRecord for RegistrationRecord {
    const KIND: EntityKind = EntityKind::Registration;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawRegistration = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            student_id: raw.student_id,
            student_name: raw.student_name,
            program_name: raw.program_name,
            amount: raw.amount,
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
        vec![LookupRef {
            kind: EntityKind::Student,
            external_id: self.student_id.clone(),
            name: self.student_name.clone(),
        }]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("student_id", Some(self.student_id.clone())),
            ("program_name", self.program_name.clone()),
            ("amount", self.amount.clone()),
            ("status", self.status.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "student_id": self.student_id,
            "program_name": self.program_name,
            "amount": self.amount,
            "status": self.status,
        })
    }
}
