//! In-memory document store — the demo's mock database and the test fake.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{DocumentStore, SaveAck, StoreError};
use crate::record::Snapshot;

/// Keyed in-memory snapshot storage. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held.
    pub async fn document_count(&self) -> usize {
        self.docs.read().await.len()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn save_document(&self, id: &str, snapshot: &Snapshot) -> Result<SaveAck, StoreError> {
        self.docs.write().await.insert(id.to_owned(), snapshot.clone());
        Ok(SaveAck { success: true })
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
