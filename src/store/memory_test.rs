use super::*;
use crate::record::{Record, RecordId, ShapeRecord, Snapshot};

fn one_shape_snapshot(id: &str) -> Snapshot {
    let mut shape = ShapeRecord::new("geo", 0.0, 0.0);
    shape.id = RecordId::new(id);
    Snapshot::new(vec![Record::Shape(shape)])
}

#[tokio::test]
async fn get_missing_document_returns_none() {
    let store = MemoryStore::new();
    let result = store.get_document("doc1").await.expect("get");
    assert!(result.is_none());
}

#[tokio::test]
async fn save_then_get_round_trips() {
    let store = MemoryStore::new();
    let snapshot = one_shape_snapshot("s1");

    let ack = store.save_document("doc1", &snapshot).await.expect("save");
    assert!(ack.success);

    let loaded = store.get_document("doc1").await.expect("get").expect("present");
    assert_eq!(loaded, snapshot);
}

#[tokio::test]
async fn save_supersedes_previous_snapshot() {
    let store = MemoryStore::new();
    store.save_document("doc1", &one_shape_snapshot("s1")).await.expect("save");
    store.save_document("doc1", &one_shape_snapshot("s2")).await.expect("save");

    let loaded = store.get_document("doc1").await.expect("get").expect("present");
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains(&RecordId::new("s2")));
    assert!(!loaded.contains(&RecordId::new("s1")));
    assert_eq!(store.document_count().await, 1);
}

#[tokio::test]
async fn documents_are_isolated_by_id() {
    let store = MemoryStore::new();
    store.save_document("doc1", &one_shape_snapshot("s1")).await.expect("save");
    store.save_document("doc2", &one_shape_snapshot("s2")).await.expect("save");

    let doc1 = store.get_document("doc1").await.expect("get").expect("present");
    assert!(doc1.contains(&RecordId::new("s1")));
    assert!(!doc1.contains(&RecordId::new("s2")));
}
