use super::*;
use crate::record::ShapeRecord;

fn shape(id: &str, version: i64) -> Record {
    let mut record = ShapeRecord::new("geo", 10.0, 20.0);
    record.id = RecordId::new(id);
    record.version = version;
    Record::Shape(record)
}

// =============================================================================
// MUTATIONS + EVENTS
// =============================================================================

#[tokio::test]
async fn apply_emits_created_then_updated() {
    let canvas = CanvasStore::new();
    let mut sub = canvas.subscribe().await;

    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;
    let event = sub.events.try_recv().expect("created event");
    assert_eq!(event.source, Source::User);
    assert_eq!(event.changes.len(), 1);
    assert_eq!(event.changes[0].mutation, Mutation::Created);

    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;
    let event = sub.events.try_recv().expect("updated event");
    assert_eq!(event.changes[0].mutation, Mutation::Updated);
}

#[tokio::test]
async fn user_update_bumps_version() {
    let canvas = CanvasStore::new();
    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;
    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;

    let record = canvas.record(&RecordId::new("s1")).await.expect("record");
    assert_eq!(record.version(), 2);
}

#[tokio::test]
async fn remote_merge_skips_stale_records() {
    let canvas = CanvasStore::new();
    canvas.apply_records(vec![shape("s1", 5)], Source::User).await;

    // Stale remote copy must not clobber the newer live record.
    canvas.apply_records(vec![shape("s1", 2)], Source::Remote).await;
    let record = canvas.record(&RecordId::new("s1")).await.expect("record");
    assert_eq!(record.version(), 5);

    // Newer remote copy wins.
    canvas.apply_records(vec![shape("s1", 9)], Source::Remote).await;
    let record = canvas.record(&RecordId::new("s1")).await.expect("record");
    assert_eq!(record.version(), 9);
}

#[tokio::test]
async fn remote_merge_carries_remote_source() {
    let canvas = CanvasStore::new();
    let mut sub = canvas.subscribe().await;

    canvas.apply_records(vec![shape("s1", 1)], Source::Remote).await;
    let event = sub.events.try_recv().expect("event");
    assert_eq!(event.source, Source::Remote);
}

#[tokio::test]
async fn delete_emits_only_for_existing_records() {
    let canvas = CanvasStore::new();
    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;
    let mut sub = canvas.subscribe().await;

    canvas
        .delete_records(&[RecordId::new("s1"), RecordId::new("s-missing")], Source::User)
        .await;

    let event = sub.events.try_recv().expect("delete event");
    assert_eq!(event.changes.len(), 1);
    assert_eq!(event.changes[0].mutation, Mutation::Deleted);
    assert!(canvas.is_empty().await);

    // No event at all when nothing matched.
    canvas.delete_records(&[RecordId::new("s-missing")], Source::User).await;
    assert!(sub.events.try_recv().is_err());
}

// =============================================================================
// QUERIES + SNAPSHOTS
// =============================================================================

#[tokio::test]
async fn query_by_kind_is_filtered_and_ordered() {
    let canvas = CanvasStore::new();
    canvas
        .apply_records(
            vec![
                shape("s2", 1),
                shape("s1", 1),
                Record::Page(crate::record::PageRecord {
                    id: RecordId::new("p1"),
                    name: "Page 1".into(),
                    index: 0,
                    version: 1,
                }),
            ],
            Source::User,
        )
        .await;

    let shapes = canvas.query_records_by_kind(RecordKind::Shape).await;
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].id().as_str(), "s1");
    assert_eq!(shapes[1].id().as_str(), "s2");

    let pages = canvas.query_records_by_kind(RecordKind::Page).await;
    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn snapshot_captures_full_state() {
    let canvas = CanvasStore::new();
    canvas.apply_records(vec![shape("s1", 1), shape("s2", 1)], Source::User).await;

    let snapshot = canvas.snapshot().await;
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.validate().is_ok());

    // Snapshot is a capture, not a view: later edits don't show up in it.
    canvas.delete_records(&[RecordId::new("s1")], Source::User).await;
    assert_eq!(snapshot.len(), 2);
    assert_eq!(canvas.len().await, 1);
}

// =============================================================================
// SUBSCRIPTION LIFECYCLE
// =============================================================================

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let canvas = CanvasStore::new();
    let sub = canvas.subscribe().await;
    assert_eq!(canvas.subscriber_count().await, 1);

    canvas.unsubscribe(sub.id).await;
    assert_eq!(canvas.subscriber_count().await, 0);

    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;
    let mut sub = sub;
    assert!(sub.events.try_recv().is_err());
}

#[tokio::test]
async fn dropped_receiver_is_pruned_on_emit() {
    let canvas = CanvasStore::new();
    let sub = canvas.subscribe().await;
    drop(sub.events);

    canvas.apply_records(vec![shape("s1", 1)], Source::User).await;
    assert_eq!(canvas.subscriber_count().await, 0);
}
