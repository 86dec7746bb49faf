//! Sync bridge — mediates between the live canvas store and the remote
//! document store.
//!
//! DESIGN
//! ======
//! One worker task per mounted document owns the whole bridge lifecycle:
//! hydrate once, then watch canvas change events and push debounced
//! snapshot saves. Because the worker performs saves sequentially, at most
//! one save is ever in flight per document, and edits arriving mid-save
//! coalesce into a single superseding save that captures the latest state.
//!
//! Loop prevention: hydration merges are applied with `Source::Remote`, and
//! the worker ignores remote-sourced events, so loading a document never
//! schedules a save of that same document.
//!
//! ERROR HANDLING
//! ==============
//! Hydrate and save failures are non-fatal. They surface on the status
//! channel as [`DocStatus::Error`] and the bridge stays mounted; the next
//! edit or manual save retries naturally.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::ErrorCode;
use crate::canvas::{CanvasStore, Source, Subscription};
use crate::record::{Snapshot, SnapshotError};
use crate::store::{DocumentStore, StoreError};

/// Default trailing-edge debounce window for outbound saves.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(250);

const COMMAND_CHANNEL_CAPACITY: usize = 8;

// =============================================================================
// ERRORS
// =============================================================================

/// A hydration that could not complete.
#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] SnapshotError),
}

impl ErrorCode for HydrationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(_) => "E_HYDRATE_STORE",
            Self::Malformed(_) => "E_HYDRATE_MALFORMED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.retryable())
    }
}

/// A save that could not complete.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),
    #[error("store rejected write for document {0}")]
    Rejected(String),
}

impl ErrorCode for SaveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(_) => "E_SAVE_STORE",
            Self::Rejected(_) => "E_SAVE_REJECTED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.retryable(),
            Self::Rejected(_) => false,
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Per-document bridge lifecycle, surfaced to the shell over a watch
/// channel: `Unloaded -> Hydrating -> Idle -> Dirty -> Saving -> Idle`,
/// with `Error` on a failed hydrate or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocStatus {
    /// Before mount.
    Unloaded,
    /// Initial fetch in flight.
    Hydrating,
    /// No unsaved changes.
    Idle,
    /// Edits received; debounce timer running.
    Dirty,
    /// Snapshot in flight to the store.
    Saving,
    /// Last hydrate or save failed; the bridge remains usable.
    Error { code: &'static str, message: String },
}

impl DocStatus {
    #[must_use]
    pub fn failed<E: ErrorCode>(err: &E) -> Self {
        Self::Error { code: err.error_code(), message: err.to_string() }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Fetch the latest snapshot for `document_id` and merge it into the canvas
/// with remote provenance. Returns whether a stored snapshot was found; an
/// empty store is not an error and leaves the canvas untouched.
///
/// Merging is by record id, last-write-wins per record, so repeated
/// hydration with no intervening edits is idempotent.
///
/// # Errors
///
/// Returns a [`HydrationError`] if the store is unreachable or the stored
/// snapshot violates document invariants.
pub async fn hydrate(
    store: &dyn DocumentStore,
    canvas: &CanvasStore,
    document_id: &str,
) -> Result<bool, HydrationError> {
    let Some(snapshot) = store.get_document(document_id).await? else {
        debug!(document_id, "no stored snapshot; canvas left as-is");
        return Ok(false);
    };

    snapshot.validate()?;
    debug!(document_id, records = snapshot.len(), "hydrating canvas");
    canvas.apply_records(snapshot.into_records(), Source::Remote).await;
    Ok(true)
}

async fn save(store: &dyn DocumentStore, document_id: &str, snapshot: &Snapshot) -> Result<(), SaveError> {
    let ack = store.save_document(document_id, snapshot).await?;
    if ack.success {
        Ok(())
    } else {
        Err(SaveError::Rejected(document_id.to_owned()))
    }
}

// =============================================================================
// BRIDGE
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct BridgeOptions {
    /// Trailing-edge window: each user edit resets the timer, one save per
    /// quiet period.
    pub debounce: Duration,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self { debounce: DEFAULT_SAVE_DEBOUNCE }
    }
}

enum Command {
    SaveNow,
}

/// Handle to a mounted document's bridge worker.
pub struct SyncBridge {
    document_id: String,
    cmd_tx: mpsc::Sender<Command>,
    status_rx: watch::Receiver<DocStatus>,
    worker: JoinHandle<()>,
}

impl SyncBridge {
    /// Mount a document: subscribe to the canvas, then spawn the worker
    /// that hydrates and keeps the store in sync.
    pub async fn mount(
        store: Arc<dyn DocumentStore>,
        canvas: CanvasStore,
        document_id: impl Into<String>,
        options: BridgeOptions,
    ) -> Self {
        let document_id = document_id.into();
        // Subscribe before spawning so edits racing the mount are not lost.
        let subscription = canvas.subscribe().await;
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (status_tx, status_rx) = watch::channel(DocStatus::Unloaded);

        let worker = Worker {
            document_id: document_id.clone(),
            store,
            canvas,
            subscription,
            cmd_rx,
            status_tx,
            debounce: options.debounce,
        };
        let worker = tokio::spawn(worker.run());

        Self { document_id, cmd_tx, status_rx, worker }
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Current bridge status.
    #[must_use]
    pub fn status(&self) -> DocStatus {
        self.status_rx.borrow().clone()
    }

    /// A watch receiver for observing status transitions.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<DocStatus> {
        self.status_rx.clone()
    }

    /// Flush a save immediately, bypassing the debounce window.
    pub async fn save_now(&self) {
        let _ = self.cmd_tx.send(Command::SaveNow).await;
    }

    /// Unmount: stop the worker and cancel the canvas subscription. A save
    /// already in flight completes, but no further saves happen.
    pub async fn unmount(self) {
        drop(self.cmd_tx);
        let _ = self.worker.await;
    }
}

// =============================================================================
// WORKER
// =============================================================================

struct Worker {
    document_id: String,
    store: Arc<dyn DocumentStore>,
    canvas: CanvasStore,
    subscription: Subscription,
    cmd_rx: mpsc::Receiver<Command>,
    status_tx: watch::Sender<DocStatus>,
    debounce: Duration,
}

impl Worker {
    async fn run(mut self) {
        self.set_status(DocStatus::Hydrating);
        match hydrate(self.store.as_ref(), &self.canvas, &self.document_id).await {
            Ok(found) => {
                debug!(document_id = %self.document_id, found, "hydration complete");
                self.set_status(DocStatus::Idle);
            }
            Err(e) => {
                warn!(error = %e, document_id = %self.document_id, "hydration failed");
                self.set_status(DocStatus::failed(&e));
            }
        }

        // Trailing-edge debounce: `deadline` is set while edits are pending.
        let mut deadline: Option<Instant> = None;
        loop {
            let flush_at = deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(Command::SaveNow) => {
                        deadline = None;
                        self.flush().await;
                    }
                    // Handle dropped: unmount.
                    None => break,
                },
                event = self.subscription.events.recv() => match event {
                    Some(event) => {
                        // Loop prevention: hydration merges carry remote
                        // provenance and never schedule a save.
                        if event.source == Source::User {
                            deadline = Some(Instant::now() + self.debounce);
                            self.set_status(DocStatus::Dirty);
                        }
                    }
                    None => break,
                },
                () = tokio::time::sleep_until(flush_at), if deadline.is_some() => {
                    deadline = None;
                    self.flush().await;
                }
            }
        }

        self.canvas.unsubscribe(self.subscription.id).await;
        debug!(document_id = %self.document_id, "bridge unmounted");
    }

    async fn flush(&mut self) {
        self.set_status(DocStatus::Saving);
        let snapshot = self.canvas.snapshot().await;

        match save(self.store.as_ref(), &self.document_id, &snapshot).await {
            Ok(()) => {
                debug!(document_id = %self.document_id, records = snapshot.len(), "document saved");
                self.set_status(DocStatus::Idle);
            }
            Err(e) => {
                warn!(error = %e, document_id = %self.document_id, "save failed");
                self.set_status(DocStatus::failed(&e));
            }
        }
    }

    fn set_status(&self, status: DocStatus) {
        // Send failure means the handle is gone; the worker is about to
        // exit and nothing observes status anymore.
        let _ = self.status_tx.send(status);
    }
}

#[cfg(test)]
#[path = "bridge_test.rs"]
mod tests;
