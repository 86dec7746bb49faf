//! Remote document store — the persistence seam behind the sync bridge.
//!
//! DESIGN
//! ======
//! The bridge only ever talks to [`DocumentStore`], an injected trait with
//! keyed get/save of the latest snapshot per document. Three backends:
//! [`MemoryStore`] (the mock database, also the test fake), [`PgStore`]
//! (Postgres via sqlx), and [`HttpStore`] (this crate's own HTTP API from
//! another process). The store retains only the latest snapshot per id —
//! every successful save supersedes the previous one.

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use serde::{Deserialize, Serialize};

use crate::record::Snapshot;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced by document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("store request failed: {0}")]
    Transport(String),

    /// The store answered but refused the request.
    #[error("store rejected request: status {status}")]
    Rejected { status: u16, body: String },

    /// The stored payload could not be decoded as a snapshot.
    #[error("store payload decode failed: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_STORE_TRANSPORT",
            Self::Rejected { .. } => "E_STORE_REJECTED",
            Self::Decode(_) => "E_STORE_DECODE",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Rejected { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Acknowledgement returned by [`DocumentStore::save_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    pub success: bool,
}

/// Keyed latest-snapshot storage.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the latest snapshot for a document, or `None` if the document
    /// has never been saved.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store is unreachable or the stored
    /// payload is undecodable.
    async fn get_document(&self, id: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Replace the latest snapshot for a document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store is unreachable or refuses the
    /// write.
    async fn save_document(&self, id: &str, snapshot: &Snapshot) -> Result<SaveAck, StoreError>;
}
