//! Enrollment — places a student in a class. References both; the
//! student reference is checked first, so a record missing both skips
//! with `student_not_synced_yet`.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawEnrollment {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(deserialize_with = "flexible_string")]
    student_id: String,
    #[serde(deserialize_with = "flexible_string")]
    class_id: String,
    #[serde(default)]
    student_name: Option<String>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    pub external_id: String,
    pub student_id: String,
    pub class_id: String,
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    pub status: Option<String>,
}

impl SyncRecord for EnrollmentRecord {
    const KIND: EntityKind = EntityKind::Enrollment;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawEnrollment = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            student_id: raw.student_id,
            class_id: raw.class_id,
            student_name: raw.student_name,
            class_name: raw.class_name,
            status: raw.status,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("student_id", &self.student_id)?;
        require_nonblank("class_id", &self.class_id)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        vec![
            LookupRef {
                kind: EntityKind::Student,
                external_id: self.student_id.clone(),
                name: self.student_name.clone(),
            },
            LookupRef {
                kind: EntityKind::Class,
                external_id: self.class_id.clone(),
                name: self.class_name.clone(),
            },
        ]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("student_id", Some(self.student_id.clone())),
            ("class_id", Some(self.class_id.clone())),
            ("status", self.status.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "student_id": self.student_id,
            "class_id": self.class_id,
            "status": self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refs_check_student_before_class() {
        let raw = serde_json::json!({"id": "e1", "student_id": "s1", "class_id": "c1"});
        let record = EnrollmentRecord::parse(&raw).unwrap();
        let refs = record.lookup_refs();
        assert_eq!(refs[0].kind, EntityKind::Student);
        assert_eq!(refs[1].kind, EntityKind::Class);
        assert_eq!(refs[0].skip_reason(), "student_not_synced_yet");
    }

    #[test]
    fn ref_values_map_to_columns() {
        let raw = serde_json::json!({"id": "e1", "student_id": "s1", "class_id": "c1"});
        let record = EnrollmentRecord::parse(&raw).unwrap();
        let refs = record.ref_values();
        assert_eq!(refs.get("student_external_id").map(String::as_str), Some("s1"));
        assert_eq!(refs.get("class_external_id").map(String::as_str), Some("c1"));
    }
}
