use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::*;
use crate::record::{Record, RecordId, ShapeRecord, Snapshot};
use crate::state::test_helpers;
use crate::store::DocumentStore;

fn shape(id: &str) -> Record {
    let mut record = ShapeRecord::new("geo", 0.0, 0.0);
    record.id = RecordId::new(id);
    Record::Shape(record)
}

// =============================================================================
// HANDLERS
// =============================================================================

#[tokio::test]
async fn get_unknown_document_answers_null() {
    let (_store, state) = test_helpers::test_app_state();
    let Json(body) = get_document(State(state), Path("doc1".into()))
        .await
        .expect("ok");
    assert!(body.is_none());
}

#[tokio::test]
async fn save_then_get_round_trips_over_handlers() {
    let (_store, state) = test_helpers::test_app_state();
    let snapshot = Snapshot::new(vec![shape("s1"), shape("s2")]);

    let Json(saved) = save_document(State(state.clone()), Path("doc1".into()), Json(snapshot.clone()))
        .await
        .expect("ok");
    assert!(saved.success);

    let Json(body) = get_document(State(state), Path("doc1".into()))
        .await
        .expect("ok");
    assert_eq!(body, Some(snapshot));
}

#[tokio::test]
async fn save_rejects_invalid_snapshot() {
    let (store, state) = test_helpers::test_app_state();
    let invalid = Snapshot::new(vec![shape("s1"), shape("s1")]);

    let status = save_document(State(state), Path("doc1".into()), Json(invalid))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.get_document("doc1").await.expect("get").is_none());
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

#[test]
fn store_error_to_status_maps_transport() {
    let err = StoreError::Transport("connection refused".into());
    assert_eq!(store_error_to_status(err), StatusCode::BAD_GATEWAY);
}

#[test]
fn store_error_to_status_maps_decode() {
    let err = StoreError::Decode("bad json".into());
    assert_eq!(store_error_to_status(err), StatusCode::INTERNAL_SERVER_ERROR);
}
