//! End-to-end decision-machine tests against a real in-memory store.

use std::sync::Arc;

use recsync_core::decision::SyncOutcome;
use recsync_core::entity::EntityKind;
use recsync_core::traits::ILocalStore;
use recsync_engine::BatchIngress;
use recsync_storage::StorageEngine;
use serde_json::json;

fn ingress() -> (BatchIngress, Arc<dyn ILocalStore>) {
    let store: Arc<dyn ILocalStore> = Arc::new(StorageEngine::open_in_memory().unwrap());
    (BatchIngress::new(store.clone()), store)
}

#[test]
fn new_then_unchanged_then_updated_with_diff() {
    let (ingress, _) = ingress();

    let batch = vec![test_fixtures::raw_program("p1", "Intro", "100")];
    let report = ingress.ingest(EntityKind::Program, &batch, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::New);

    // Same payload again: idempotent, no UPDATED with empty diff.
    let report = ingress.ingest(EntityKind::Program, &batch, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::Unchanged);
    assert!(report.results[0].changes.is_none());

    // Price change: UPDATED with a before/after pair for price only.
    let batch = vec![test_fixtures::raw_program("p1", "Intro", "150")];
    let report = ingress.ingest(EntityKind::Program, &batch, "t1");
    let decision = &report.results[0];
    assert_eq!(decision.status, SyncOutcome::Updated);
    let changes = decision.changes.as_ref().unwrap();
    assert_eq!(
        changes.get("price").unwrap(),
        &(Some("100".to_string()), Some("150".to_string()))
    );
    assert!(!changes.contains_key("name"));
}

#[test]
fn enrollment_skips_until_dependencies_exist() {
    let (ingress, _) = ingress();

    let enrollment = vec![test_fixtures::raw_enrollment("e1", "s1", "c1")];
    let report = ingress.ingest(EntityKind::Enrollment, &enrollment, "t1");
    let decision = &report.results[0];
    assert_eq!(decision.status, SyncOutcome::Skipped);
    assert_eq!(decision.reason.as_deref(), Some("student_not_synced_yet"));

    // Student alone is not enough; the class reference still blocks.
    ingress.ingest(
        EntityKind::Student,
        &[test_fixtures::raw_student("s1", "Ada")],
        "t1",
    );
    let report = ingress.ingest(EntityKind::Enrollment, &enrollment, "t1");
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("class_not_synced_yet")
    );

    // Classes require their teacher first.
    ingress.ingest(
        EntityKind::Teacher,
        &[test_fixtures::raw_teacher("te1", "Grace")],
        "t1",
    );
    ingress.ingest(
        EntityKind::Class,
        &[test_fixtures::raw_class("c1", "Algebra", "te1")],
        "t1",
    );

    // Resubmission of the identical enrollment now lands as NEW.
    let report = ingress.ingest(EntityKind::Enrollment, &enrollment, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::New);
}

#[test]
fn dependencies_are_tenant_scoped() {
    let (ingress, _) = ingress();
    ingress.ingest(
        EntityKind::Student,
        &[test_fixtures::raw_student("s1", "Ada")],
        "t1",
    );

    let report = ingress.ingest(
        EntityKind::Registration,
        &[test_fixtures::raw_registration("r1", "s1")],
        "t2",
    );
    assert_eq!(report.results[0].status, SyncOutcome::Skipped);
}

#[test]
fn invalid_records_never_abort_the_batch() {
    let (ingress, store) = ingress();

    let batch = vec![
        json!({"Product_Name": "No id here"}),
        test_fixtures::raw_program("p2", "Kept", "50"),
        json!({"id": "p3"}),
    ];
    let report = ingress.ingest(EntityKind::Program, &batch, "t1");

    assert_eq!(report.counts.total, 3);
    assert_eq!(report.counts.invalid, 2);
    assert_eq!(report.counts.new, 1);
    assert_eq!(report.results[1].status, SyncOutcome::New);
    // Invalid records left no rows behind.
    assert_eq!(store.count(EntityKind::Program, "t1").unwrap(), 1);
}

#[test]
fn skipped_and_invalid_write_nothing() {
    let (ingress, store) = ingress();
    ingress.ingest(
        EntityKind::Enrollment,
        &[test_fixtures::raw_enrollment("e1", "s1", "c1")],
        "t1",
    );
    assert_eq!(store.count(EntityKind::Enrollment, "t1").unwrap(), 0);
}

#[test]
fn change_limited_to_unfingerprinted_field_reads_unchanged() {
    let (ingress, store) = ingress();

    ingress.ingest(
        EntityKind::Student,
        &[json!({"id": "s1", "name": "Ada"})],
        "t1",
    );
    // Only the target-assigned id changed; fingerprint ignores it.
    let report = ingress.ingest(
        EntityKind::Student,
        &[json!({"id": "s1", "name": "Ada", "target_id": "990"})],
        "t1",
    );
    assert_eq!(report.results[0].status, SyncOutcome::Unchanged);

    // The stored attrs still hold the value from the write that created
    // the row; UNCHANGED performs no write.
    let row = store.get(EntityKind::Student, "t1", "s1").unwrap().unwrap();
    assert_eq!(row.attrs.get("target_id").cloned().flatten(), None);
}

#[test]
fn cosmetic_variants_hash_identically() {
    let (ingress, _) = ingress();
    ingress.ingest(
        EntityKind::Program,
        &[json!({"id": "p1", "name": "Intro", "price": "100"})],
        "t1",
    );
    let report = ingress.ingest(
        EntityKind::Program,
        &[json!({"id": "p1", "name": "  INTRO ", "price": "100"})],
        "t1",
    );
    assert_eq!(report.results[0].status, SyncOutcome::Unchanged);
}

#[test]
fn batch_counts_cover_every_outcome() {
    let (ingress, _) = ingress();
    ingress.ingest(
        EntityKind::Student,
        &[test_fixtures::raw_student("s1", "Ada")],
        "t1",
    );

    let batch = vec![
        test_fixtures::raw_student("s1", "Ada"),         // unchanged
        test_fixtures::raw_student("s2", "Lin"),         // new
        json!({"name": "missing id"}),                   // invalid
    ];
    let report = ingress.ingest(EntityKind::Student, &batch, "t1");
    assert_eq!(report.counts.total, 3);
    assert_eq!(report.counts.unchanged, 1);
    assert_eq!(report.counts.new, 1);
    assert_eq!(report.counts.invalid, 1);
    assert_eq!(report.counts.errors, 0);
}

#[test]
fn payment_chain_unblocks_as_each_ancestor_syncs() {
    let (ingress, _) = ingress();

    let payment = vec![test_fixtures::raw_payment("pay1", "r1", "250")];
    let report = ingress.ingest(EntityKind::Payment, &payment, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::Skipped);
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("registration_not_synced_yet")
    );

    // the registration itself is blocked on its student
    let registration = vec![test_fixtures::raw_registration("r1", "s1")];
    let report = ingress.ingest(EntityKind::Registration, &registration, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::Skipped);
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("student_not_synced_yet")
    );

    ingress.ingest(
        EntityKind::Student,
        &[test_fixtures::raw_student("s1", "Ada")],
        "t1",
    );
    let report = ingress.ingest(EntityKind::Registration, &registration, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::New);

    let report = ingress.ingest(EntityKind::Payment, &payment, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::New);
}

#[test]
fn grade_requires_the_full_enrollment_chain() {
    let (ingress, _) = ingress();

    let grade = vec![test_fixtures::raw_grade("g1", "e1", "95")];
    let report = ingress.ingest(EntityKind::Grade, &grade, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::Skipped);
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("enrollment_not_synced_yet")
    );

    ingress.ingest(
        EntityKind::Teacher,
        &[test_fixtures::raw_teacher("t1", "Ada")],
        "t1",
    );
    ingress.ingest(
        EntityKind::Class,
        &[test_fixtures::raw_class("c1", "Algebra", "t1")],
        "t1",
    );
    ingress.ingest(
        EntityKind::Student,
        &[test_fixtures::raw_student("s1", "Lin")],
        "t1",
    );
    ingress.ingest(
        EntityKind::Enrollment,
        &[test_fixtures::raw_enrollment("e1", "s1", "c1")],
        "t1",
    );

    let report = ingress.ingest(EntityKind::Grade, &grade, "t1");
    assert_eq!(report.results[0].status, SyncOutcome::New);
}

#[test]
fn unit_and_request_skip_on_their_single_missing_refs() {
    let (ingress, _) = ingress();

    let report = ingress.ingest(
        EntityKind::Unit,
        &[test_fixtures::raw_unit("u1", "c9", "Week 1")],
        "t1",
    );
    assert_eq!(report.results[0].status, SyncOutcome::Skipped);
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("class_not_synced_yet")
    );

    let report = ingress.ingest(
        EntityKind::Request,
        &[test_fixtures::raw_request("q1", "s9")],
        "t1",
    );
    assert_eq!(report.results[0].status, SyncOutcome::Skipped);
    assert_eq!(
        report.results[0].reason.as_deref(),
        Some("student_not_synced_yet")
    );
}
