//! Canvas document model — the reactive record store behind the drawing
//! surface.
//!
//! DESIGN
//! ======
//! `CanvasStore` owns the live, mutable working copy of one document. Every
//! mutation is tagged with a provenance [`Source`] and fanned out to
//! subscribers as a [`ChangeEvent`]; the sync bridge uses the tag to tell
//! user edits apart from its own hydration merges. Subscribers are plain
//! bounded channels: a closed receiver is pruned on the next emit, a full
//! one drops the event with a warning rather than blocking a mutation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::warn;
use uuid::Uuid;

use crate::record::{Record, RecordId, RecordKind, Snapshot};

/// Bound on each subscriber's event queue.
const EVENT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// CHANGE EVENTS
// =============================================================================

/// Provenance marker distinguishing user-driven edits from bridge-originated
/// merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    User,
    Remote,
}

/// How a record was affected by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

/// One affected record within a [`ChangeEvent`].
#[derive(Debug, Clone)]
pub struct RecordChange {
    pub id: RecordId,
    pub mutation: Mutation,
}

/// A batch of record changes applied in one mutation call.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub source: Source,
    pub changes: Vec<RecordChange>,
}

/// A live subscription to canvas change events. Cancel with
/// [`CanvasStore::unsubscribe`]; dropping the receiver has the same effect
/// at the next emit.
pub struct Subscription {
    pub id: Uuid,
    pub events: mpsc::Receiver<ChangeEvent>,
}

// =============================================================================
// CANVAS STORE
// =============================================================================

#[derive(Default)]
struct CanvasInner {
    records: HashMap<RecordId, Record>,
    subscribers: HashMap<Uuid, mpsc::Sender<ChangeEvent>>,
}

/// The live record store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct CanvasStore {
    inner: Arc<RwLock<CanvasInner>>,
}

impl CanvasStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener.
    pub async fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let id = Uuid::new_v4();
        self.inner.write().await.subscribers.insert(id, tx);
        Subscription { id, events: rx }
    }

    /// Cancel a change listener. Unknown ids are ignored.
    pub async fn unsubscribe(&self, id: Uuid) {
        self.inner.write().await.subscribers.remove(&id);
    }

    /// Upsert a batch of records and notify subscribers once.
    ///
    /// User-sourced writes always win and bump the stored version past the
    /// current one. Remote-sourced writes merge last-write-wins per record:
    /// an incoming record older than the live one is skipped.
    pub async fn apply_records(&self, records: Vec<Record>, source: Source) {
        let mut inner = self.inner.write().await;
        let mut changes = Vec::with_capacity(records.len());

        for mut record in records {
            match inner.records.get(record.id()) {
                Some(existing) => {
                    match source {
                        Source::Remote => {
                            if record.version() < existing.version() {
                                continue;
                            }
                        }
                        Source::User => {
                            record.set_version(existing.version() + 1);
                        }
                    }
                    changes.push(RecordChange { id: record.id().clone(), mutation: Mutation::Updated });
                }
                None => {
                    changes.push(RecordChange { id: record.id().clone(), mutation: Mutation::Created });
                }
            }
            inner.records.insert(record.id().clone(), record);
        }

        emit(&mut inner, source, changes);
    }

    /// Remove records and notify subscribers once. Missing ids are ignored.
    pub async fn delete_records(&self, ids: &[RecordId], source: Source) {
        let mut inner = self.inner.write().await;
        let mut changes = Vec::with_capacity(ids.len());

        for id in ids {
            if inner.records.remove(id).is_some() {
                changes.push(RecordChange { id: id.clone(), mutation: Mutation::Deleted });
            }
        }

        emit(&mut inner, source, changes);
    }

    /// All records of one kind, ordered by id.
    pub async fn query_records_by_kind(&self, kind: RecordKind) -> Vec<Record> {
        let inner = self.inner.read().await;
        let mut records: Vec<Record> = inner
            .records
            .values()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));
        records
    }

    /// Fetch one record by id.
    pub async fn record(&self, id: &RecordId) -> Option<Record> {
        self.inner.read().await.records.get(id).cloned()
    }

    /// Capture an immutable snapshot of the full document state.
    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().await;
        Snapshot::new(inner.records.values().cloned().collect())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }

    #[cfg(test)]
    pub(crate) async fn subscriber_count(&self) -> usize {
        self.inner.read().await.subscribers.len()
    }
}

/// Fan a change batch out to subscribers. Closed receivers are pruned; a
/// full queue drops the event for that subscriber only.
fn emit(inner: &mut CanvasInner, source: Source, changes: Vec<RecordChange>) {
    if changes.is_empty() {
        return;
    }

    let event = ChangeEvent { source, changes };
    let mut closed = Vec::new();

    for (id, tx) in &inner.subscribers {
        match tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(subscriber = %id, "canvas event queue full; dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                closed.push(*id);
            }
        }
    }

    for id in closed {
        inner.subscribers.remove(&id);
    }
}

#[cfg(test)]
#[path = "canvas_test.rs"]
mod tests;
