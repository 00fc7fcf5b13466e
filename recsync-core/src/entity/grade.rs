//! Grade — a score for one enrollment; references it.

use serde::Deserialize;
use serde_json::json;

use super::raw::{flexible_string, opt_flexible_string, parse_as, require_nonblank};
use super::{EntityKind, LookupRef, SyncRecord};

#[derive(Debug, Deserialize)]
struct RawGrade {
    #[serde(deserialize_with = "flexible_string")]
    id: String,
    #[serde(deserialize_with = "flexible_string")]
    enrollment_id: String,
    #[serde(deserialize_with = "flexible_string")]
    score: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_string")]
    graded_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub external_id: String,
    pub enrollment_id: String,
    pub score: String,
    pub comment: Option<String>,
    pub graded_at: Option<String>,
}

impl SyncRecord for GradeRecord {
    const KIND: EntityKind = EntityKind::Grade;

    fn parse(raw: &serde_json::Value) -> Result<Self, String> {
        let raw: RawGrade = parse_as(raw)?;
        Ok(Self {
            external_id: raw.id,
            enrollment_id: raw.enrollment_id,
            score: raw.score,
            comment: raw.comment,
            graded_at: raw.graded_at,
        })
    }

    fn external_id(&self) -> &str {
        &self.external_id
    }

    fn validate(&self) -> Result<(), String> {
        require_nonblank("id", &self.external_id)?;
        require_nonblank("enrollment_id", &self.enrollment_id)?;
        require_nonblank("score", &self.score)
    }

    fn lookup_refs(&self) -> Vec<LookupRef> {
        vec![LookupRef::new(
            EntityKind::Enrollment,
            self.enrollment_id.clone(),
        )]
    }

    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("enrollment_id", Some(self.enrollment_id.clone())),
            ("score", Some(self.score.clone())),
            ("comment", self.comment.clone()),
            ("graded_at", self.graded_at.clone()),
        ]
    }

    fn target_payload(&self) -> serde_json::Value {
        json!({
            "external_id": self.external_id,
            "enrollment_id": self.enrollment_id,
            "score": self.score,
            "comment": self.comment,
            "graded_at": self.graded_at,
        })
    }
}
