//! Read-only document viewer — hydrates a fresh canvas from the store on
//! open and again on demand, with no save subscription at all.

use std::sync::Arc;

use tracing::warn;

use crate::bridge::{HydrationError, hydrate};
use crate::canvas::CanvasStore;
use crate::store::DocumentStore;

/// A read-only projection of a stored document.
pub struct ViewerSession {
    canvas: CanvasStore,
    store: Arc<dyn DocumentStore>,
    document_id: String,
    last_error: Option<String>,
}

impl ViewerSession {
    /// Open a viewer and load the latest stored snapshot. A load failure is
    /// recorded, not raised: the viewer still opens over an empty canvas.
    pub async fn open(store: Arc<dyn DocumentStore>, document_id: impl Into<String>) -> Self {
        let mut viewer = Self {
            canvas: CanvasStore::new(),
            store,
            document_id: document_id.into(),
            last_error: None,
        };
        let _ = viewer.refresh().await;
        viewer
    }

    /// Re-fetch the latest stored snapshot and merge it into the canvas.
    ///
    /// # Errors
    ///
    /// Returns (and records) a [`HydrationError`] when the load fails.
    pub async fn refresh(&mut self) -> Result<bool, HydrationError> {
        match hydrate(self.store.as_ref(), &self.canvas, &self.document_id).await {
            Ok(found) => {
                self.last_error = None;
                Ok(found)
            }
            Err(e) => {
                warn!(error = %e, document_id = %self.document_id, "viewer refresh failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn canvas(&self) -> &CanvasStore {
        &self.canvas
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// The last load failure, if the most recent refresh did not succeed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
#[path = "viewer_test.rs"]
mod tests;
