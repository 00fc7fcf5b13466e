//! Contract checks for the scripted clients other crates test against.

use recsync_clients::{MockSourceClient, MockTargetClient, SourceApi, TargetApi, TargetOutcome};
use recsync_core::entity::EntityKind;
use recsync_core::errors::SourceError;
use test_fixtures::{raw_enrollment, raw_student};

#[tokio::test]
async fn source_mock_paginates_in_seed_order() {
    let source = MockSourceClient::new();
    source.seed(
        EntityKind::Student,
        vec![
            raw_student("S1", "Lin"),
            raw_student("S2", "Kay"),
            raw_student("S3", "Mo"),
        ],
    );

    let first = source.fetch_page(EntityKind::Student, 1, 2).await.unwrap();
    assert_eq!(first.records.len(), 2);
    assert!(first.has_more);

    let second = source.fetch_page(EntityKind::Student, 2, 2).await.unwrap();
    assert_eq!(second.records.len(), 1);
    assert!(!second.has_more);

    let empty = source.fetch_page(EntityKind::Student, 3, 2).await.unwrap();
    assert!(empty.records.is_empty());
}

#[tokio::test]
async fn source_mock_finds_records_by_canonical_id() {
    let source = MockSourceClient::new();
    source.seed(EntityKind::Student, vec![raw_student("S1", "Lin")]);

    let hit = source.fetch_by_id(EntityKind::Student, "S1").await.unwrap();
    assert!(hit.is_some());
    let miss = source.fetch_by_id(EntityKind::Student, "S9").await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn source_mock_search_matches_exact_field_value() {
    let source = MockSourceClient::new();
    source.seed(
        EntityKind::Enrollment,
        vec![
            raw_enrollment("E1", "S1", "C1"),
            raw_enrollment("E2", "S2", "C1"),
        ],
    );

    let hits = source
        .search(EntityKind::Enrollment, "student_id", "S1")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], "E1");
}

#[tokio::test]
async fn source_mock_failure_injection_covers_all_operations() {
    let source = MockSourceClient::new();
    source.seed(EntityKind::Student, vec![raw_student("S1", "Lin")]);
    source.fail_kind(EntityKind::Student, "connection reset");

    assert!(matches!(
        source.fetch_page(EntityKind::Student, 1, 10).await,
        Err(SourceError::Network { .. })
    ));
    assert!(source.fetch_by_id(EntityKind::Student, "S1").await.is_err());
}

#[tokio::test]
async fn target_mock_consumes_scripts_in_order_then_defaults_to_ok() {
    let target = MockTargetClient::new();
    target.script("upsert_student", TargetOutcome::DuplicateKey);
    target.script(
        "upsert_student",
        TargetOutcome::Failed {
            message: "rejected".to_string(),
        },
    );

    let payload = serde_json::json!({ "id": "S1" });
    assert_eq!(
        target.call("upsert_student", &payload).await.unwrap(),
        TargetOutcome::DuplicateKey
    );
    assert_eq!(
        target.call("upsert_student", &payload).await.unwrap(),
        TargetOutcome::Failed {
            message: "rejected".to_string()
        }
    );
    assert_eq!(
        target.call("upsert_student", &payload).await.unwrap(),
        TargetOutcome::Ok
    );
    assert_eq!(target.call_count("upsert_student"), 3);
    assert_eq!(target.calls()[0].1, payload);
}
