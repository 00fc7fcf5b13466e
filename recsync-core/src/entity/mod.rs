//! Entity model: kinds, the dependency graph, canonical records, and the
//! per-entity sync capability.
//!
//! The dependency graph is explicit data (`EntityKind::refs`), and the
//! full-sync step order is derived from it by topological sort rather
//! than hand-maintained, so adding a kind cannot silently break ordering.

mod class;
mod enrollment;
mod grade;
mod payment;
mod program;
mod raw;
mod registration;
mod request;
mod student;
mod teacher;
mod unit;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use class::ClassRecord;
pub use enrollment::EnrollmentRecord;
pub use grade::GradeRecord;
pub use payment::PaymentRecord;
pub use program::ProgramRecord;
pub use registration::RegistrationRecord;
pub use request::RequestRecord;
pub use student::StudentRecord;
pub use teacher::TeacherRecord;
pub use unit::UnitRecord;

use crate::decision::SyncOutcome;
use crate::errors::EngineError;
use crate::fingerprint::fingerprint_fields;

/// One foreign reference declared by an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefSpec {
    /// Denormalized column on the local table (e.g. `student_external_id`).
    pub column: &'static str,
    /// Field name used when searching the source system for dependents.
    pub source_field: &'static str,
    /// The referenced entity kind.
    pub kind: EntityKind,
}

/// Every entity type the engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Teacher,
    Student,
    Program,
    Class,
    Registration,
    Enrollment,
    Payment,
    Grade,
    Unit,
    Request,
}

impl EntityKind {
    /// All kinds, in declaration order. Declaration order is the
    /// tie-break for the derived full-sync step order.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Teacher,
        EntityKind::Student,
        EntityKind::Program,
        EntityKind::Class,
        EntityKind::Registration,
        EntityKind::Enrollment,
        EntityKind::Payment,
        EntityKind::Grade,
        EntityKind::Unit,
        EntityKind::Request,
    ];

    /// The kinds pulled from the source during a full sync. Program and
    /// Unit arrive via webhook ingress only.
    pub const FULL_SYNC_MODULES: [EntityKind; 8] = [
        EntityKind::Teacher,
        EntityKind::Student,
        EntityKind::Class,
        EntityKind::Registration,
        EntityKind::Enrollment,
        EntityKind::Payment,
        EntityKind::Grade,
        EntityKind::Request,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Teacher => "teacher",
            EntityKind::Student => "student",
            EntityKind::Program => "program",
            EntityKind::Class => "class",
            EntityKind::Registration => "registration",
            EntityKind::Enrollment => "enrollment",
            EntityKind::Payment => "payment",
            EntityKind::Grade => "grade",
            EntityKind::Unit => "unit",
            EntityKind::Request => "request",
        }
    }

    /// Parse the URL path segment used by `POST /sync/{entity}`.
    pub fn parse(name: &str) -> Result<Self, EngineError> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| EngineError::UnknownEntity {
                name: name.to_string(),
            })
    }

    /// Local table name for this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Teacher => "teachers",
            EntityKind::Student => "students",
            EntityKind::Program => "programs",
            EntityKind::Class => "classes",
            EntityKind::Registration => "registrations",
            EntityKind::Enrollment => "enrollments",
            EntityKind::Payment => "payments",
            EntityKind::Grade => "grades",
            EntityKind::Unit => "units",
            EntityKind::Request => "requests",
        }
    }

    /// Foreign references this kind carries, in the same order the
    /// canonical record emits its `lookup_refs`.
    pub fn refs(&self) -> &'static [RefSpec] {
        match self {
            EntityKind::Teacher | EntityKind::Student | EntityKind::Program => &[],
            EntityKind::Class => &[RefSpec {
                column: "teacher_external_id",
                source_field: "teacher_id",
                kind: EntityKind::Teacher,
            }],
            EntityKind::Registration => &[RefSpec {
                column: "student_external_id",
                source_field: "student_id",
                kind: EntityKind::Student,
            }],
            EntityKind::Enrollment => &[
                RefSpec {
                    column: "student_external_id",
                    source_field: "student_id",
                    kind: EntityKind::Student,
                },
                RefSpec {
                    column: "class_external_id",
                    source_field: "class_id",
                    kind: EntityKind::Class,
                },
            ],
            EntityKind::Payment => &[RefSpec {
                column: "registration_external_id",
                source_field: "registration_id",
                kind: EntityKind::Registration,
            }],
            EntityKind::Grade => &[RefSpec {
                column: "enrollment_external_id",
                source_field: "enrollment_id",
                kind: EntityKind::Enrollment,
            }],
            EntityKind::Unit => &[RefSpec {
                column: "class_external_id",
                source_field: "class_id",
                kind: EntityKind::Class,
            }],
            EntityKind::Request => &[RefSpec {
                column: "student_external_id",
                source_field: "student_id",
                kind: EntityKind::Student,
            }],
        }
    }

    /// Kinds this one requires to exist locally before it can sync.
    pub fn requires(&self) -> Vec<EntityKind> {
        self.refs().iter().map(|r| r.kind).collect()
    }

    /// Kinds that reference this one, with the source-side field used to
    /// search for them (drives the per-record resync cascade).
    pub fn dependents(&self) -> Vec<(EntityKind, &'static str)> {
        EntityKind::ALL
            .iter()
            .flat_map(|k| {
                k.refs()
                    .iter()
                    .filter(|r| r.kind == *self)
                    .map(move |r| (*k, r.source_field))
            })
            .collect()
    }

    /// Target-system ingestion function for this kind.
    pub fn target_function(&self) -> &'static str {
        match self {
            EntityKind::Teacher => "upsert_teacher",
            EntityKind::Student => "upsert_student",
            EntityKind::Program => "upsert_program",
            EntityKind::Class => "upsert_class",
            EntityKind::Registration => "upsert_registration",
            EntityKind::Enrollment => "upsert_enrollment",
            EntityKind::Payment => "upsert_payment",
            EntityKind::Grade => "upsert_grade",
            EntityKind::Unit => "upsert_unit",
            EntityKind::Request => "upsert_request",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the full-sync step order from the dependency graph.
///
/// Kahn's algorithm over [`EntityKind::FULL_SYNC_MODULES`], declaration
/// order as tie-break; references to kinds outside the module set are
/// ignored (they are ingress-only). A cycle is a programming error and
/// surfaces as [`EngineError::DependencyCycle`].
pub fn full_sync_step_order() -> Result<Vec<EntityKind>, EngineError> {
    let modules = EntityKind::FULL_SYNC_MODULES;
    let mut order = Vec::with_capacity(modules.len());
    let mut placed = std::collections::HashSet::new();

    while order.len() < modules.len() {
        let mut progressed = false;
        for kind in modules {
            if placed.contains(&kind) {
                continue;
            }
            let ready = kind
                .requires()
                .iter()
                .all(|dep| !modules.contains(dep) || placed.contains(dep));
            if ready {
                placed.insert(kind);
                order.push(kind);
                progressed = true;
            }
        }
        if !progressed {
            let stuck: Vec<&str> = modules
                .iter()
                .filter(|k| !placed.contains(*k))
                .map(|k| k.as_str())
                .collect();
            return Err(EngineError::DependencyCycle {
                detail: stuck.join(", "),
            });
        }
    }
    Ok(order)
}

/// A foreign external id (+ optional display name) embedded in a
/// canonical record, pointing at another entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRef {
    pub kind: EntityKind,
    pub external_id: String,
    pub name: Option<String>,
}

impl LookupRef {
    pub fn new(kind: EntityKind, external_id: impl Into<String>) -> Self {
        Self {
            kind,
            external_id: external_id.into(),
            name: None,
        }
    }

    /// Machine-readable skip reason when this reference is unresolved.
    pub fn skip_reason(&self) -> String {
        format!("{}_not_synced_yet", self.kind.as_str())
    }
}

/// The per-entity sync capability. One implementation per kind,
/// selected through [`CanonicalRecord`] — never by string matching.
pub trait SyncRecord: Sized {
    const KIND: EntityKind;

    /// Strict parse from a raw source payload. Missing mandatory fields
    /// or wrong types fail with a human-readable message (the caller
    /// turns it into a per-record INVALID).
    fn parse(raw: &serde_json::Value) -> Result<Self, String>;

    fn external_id(&self) -> &str;

    /// Structural validation beyond parsing: identity and mandatory
    /// fields must be non-blank.
    fn validate(&self) -> Result<(), String>;

    /// Foreign references, in the order of `Self::KIND.refs()`.
    fn lookup_refs(&self) -> Vec<LookupRef>;

    /// The ordered attribute subset covered by the fingerprint.
    /// Never includes identifiers or timestamps.
    fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)>;

    /// Attributes stored locally but deliberately outside the
    /// fingerprint (e.g. target-assigned ids). A change limited to one
    /// of these yields UNCHANGED.
    fn extra_fields(&self) -> Vec<(&'static str, Option<String>)> {
        Vec::new()
    }

    /// Payload shape the target system's ingestion function expects.
    fn target_payload(&self) -> serde_json::Value;

    /// Change-detection fingerprint for this record.
    fn fingerprint(&self) -> String {
        fingerprint_fields(&self.fingerprint_fields())
    }

    /// All persisted attributes (fingerprinted + extra).
    fn attrs(&self) -> BTreeMap<String, Option<String>> {
        let mut map = BTreeMap::new();
        for (name, value) in self.fingerprint_fields() {
            map.insert(name.to_string(), value);
        }
        for (name, value) in self.extra_fields() {
            map.insert(name.to_string(), value);
        }
        map
    }

    /// Denormalized ref column values, zipped against `KIND.refs()`.
    fn ref_values(&self) -> BTreeMap<String, String> {
        Self::KIND
            .refs()
            .iter()
            .zip(self.lookup_refs())
            .map(|(spec, r)| (spec.column.to_string(), r.external_id))
            .collect()
    }
}

/// A validated, entity-specific representation of one external record.
/// Constructed fresh on every sync call; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRecord {
    Teacher(TeacherRecord),
    Student(StudentRecord),
    Program(ProgramRecord),
    Class(ClassRecord),
    Registration(RegistrationRecord),
    Enrollment(EnrollmentRecord),
    Payment(PaymentRecord),
    Grade(GradeRecord),
    Unit(UnitRecord),
    Request(RequestRecord),
}

macro_rules! dispatch {
    ($self:expr, $record:ident => $body:expr) => {
        match $self {
            CanonicalRecord::Teacher($record) => $body,
            CanonicalRecord::Student($record) => $body,
            CanonicalRecord::Program($record) => $body,
            CanonicalRecord::Class($record) => $body,
            CanonicalRecord::Registration($record) => $body,
            CanonicalRecord::Enrollment($record) => $body,
            CanonicalRecord::Payment($record) => $body,
            CanonicalRecord::Grade($record) => $body,
            CanonicalRecord::Unit($record) => $body,
            CanonicalRecord::Request($record) => $body,
        }
    };
}

impl CanonicalRecord {
    /// Parse a raw source payload into the canonical form for `kind`.
    pub fn parse(kind: EntityKind, raw: &serde_json::Value) -> Result<Self, String> {
        Ok(match kind {
            EntityKind::Teacher => CanonicalRecord::Teacher(TeacherRecord::parse(raw)?),
            EntityKind::Student => CanonicalRecord::Student(StudentRecord::parse(raw)?),
            EntityKind::Program => CanonicalRecord::Program(ProgramRecord::parse(raw)?),
            EntityKind::Class => CanonicalRecord::Class(ClassRecord::parse(raw)?),
            EntityKind::Registration => {
                CanonicalRecord::Registration(RegistrationRecord::parse(raw)?)
            }
            EntityKind::Enrollment => CanonicalRecord::Enrollment(EnrollmentRecord::parse(raw)?),
            EntityKind::Payment => CanonicalRecord::Payment(PaymentRecord::parse(raw)?),
            EntityKind::Grade => CanonicalRecord::Grade(GradeRecord::parse(raw)?),
            EntityKind::Unit => CanonicalRecord::Unit(UnitRecord::parse(raw)?),
            EntityKind::Request => CanonicalRecord::Request(RequestRecord::parse(raw)?),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            CanonicalRecord::Teacher(_) => EntityKind::Teacher,
            CanonicalRecord::Student(_) => EntityKind::Student,
            CanonicalRecord::Program(_) => EntityKind::Program,
            CanonicalRecord::Class(_) => EntityKind::Class,
            CanonicalRecord::Registration(_) => EntityKind::Registration,
            CanonicalRecord::Enrollment(_) => EntityKind::Enrollment,
            CanonicalRecord::Payment(_) => EntityKind::Payment,
            CanonicalRecord::Grade(_) => EntityKind::Grade,
            CanonicalRecord::Unit(_) => EntityKind::Unit,
            CanonicalRecord::Request(_) => EntityKind::Request,
        }
    }

    pub fn external_id(&self) -> &str {
        dispatch!(self, r => r.external_id())
    }

    pub fn validate(&self) -> Result<(), String> {
        dispatch!(self, r => r.validate())
    }

    pub fn lookup_refs(&self) -> Vec<LookupRef> {
        dispatch!(self, r => r.lookup_refs())
    }

    pub fn fingerprint_fields(&self) -> Vec<(&'static str, Option<String>)> {
        dispatch!(self, r => r.fingerprint_fields())
    }

    pub fn fingerprint(&self) -> String {
        dispatch!(self, r => r.fingerprint())
    }

    pub fn attrs(&self) -> BTreeMap<String, Option<String>> {
        dispatch!(self, r => r.attrs())
    }

    pub fn ref_values(&self) -> BTreeMap<String, String> {
        dispatch!(self, r => r.ref_values())
    }

    pub fn target_payload(&self) -> serde_json::Value {
        dispatch!(self, r => r.target_payload())
    }
}

/// One persisted row of the locally materialized view.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalRecord {
    pub tenant_id: String,
    pub kind: EntityKind,
    pub external_id: String,
    /// Canonical attributes as stored (fingerprinted + extra).
    pub attrs: BTreeMap<String, Option<String>>,
    /// Denormalized ref column → foreign external id.
    pub refs: BTreeMap<String, String>,
    pub fingerprint: String,
    pub last_sync_status: SyncOutcome,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
