use std::sync::Arc;

use super::*;
use crate::record::{Record, RecordId, ShapeRecord, Snapshot};
use crate::store::{DocumentStore, MemoryStore};

fn shape(id: &str) -> Record {
    let mut record = ShapeRecord::new("geo", 0.0, 0.0);
    record.id = RecordId::new(id);
    Record::Shape(record)
}

#[tokio::test]
async fn open_loads_stored_snapshot() {
    let store = MemoryStore::new();
    store
        .save_document("doc1", &Snapshot::new(vec![shape("s1")]))
        .await
        .expect("seed");

    let viewer = ViewerSession::open(Arc::new(store), "doc1").await;
    assert_eq!(viewer.canvas().len().await, 1);
    assert!(viewer.last_error().is_none());
}

#[tokio::test]
async fn open_over_empty_store_is_clean() {
    let viewer = ViewerSession::open(Arc::new(MemoryStore::new()), "doc1").await;
    assert!(viewer.canvas().is_empty().await);
    assert!(viewer.last_error().is_none());
}

#[tokio::test]
async fn refresh_picks_up_later_saves() {
    let store = MemoryStore::new();
    store
        .save_document("doc1", &Snapshot::new(vec![shape("s1")]))
        .await
        .expect("seed");

    let mut viewer = ViewerSession::open(Arc::new(store.clone()), "doc1").await;
    assert_eq!(viewer.canvas().len().await, 1);

    store
        .save_document("doc1", &Snapshot::new(vec![shape("s1"), shape("s2")]))
        .await
        .expect("save");

    let found = viewer.refresh().await.expect("refresh");
    assert!(found);
    assert_eq!(viewer.canvas().len().await, 2);
}

#[tokio::test]
async fn load_failure_is_recorded_not_raised() {
    let store = MemoryStore::new();
    // Duplicate ids make the stored snapshot malformed.
    store
        .save_document("doc1", &Snapshot::new(vec![shape("s1"), shape("s1")]))
        .await
        .expect("seed");

    let mut viewer = ViewerSession::open(Arc::new(store.clone()), "doc1").await;
    assert!(viewer.last_error().is_some());
    assert!(viewer.canvas().is_empty().await);

    // A good snapshot on the next refresh clears the error.
    store
        .save_document("doc1", &Snapshot::new(vec![shape("s1")]))
        .await
        .expect("save");
    viewer.refresh().await.expect("refresh");
    assert!(viewer.last_error().is_none());
    assert_eq!(viewer.canvas().len().await, 1);
}
