//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the injected document store and the optional transform client —
//! both trait objects so handlers can be tested against fakes.

use std::sync::Arc;

use crate::store::DocumentStore;
use crate::transform::TransformImage;

/// Shared application state, injected into Axum handlers via State
/// extractor. Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Optional transform client. `None` if `OPENAI_API_KEY` is not set.
    pub transform: Option<Arc<dyn TransformImage>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, transform: Option<Arc<dyn TransformImage>>) -> Self {
        Self { store, transform }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::store::MemoryStore;

    /// Create a test `AppState` backed by a fresh in-memory store.
    #[must_use]
    pub fn test_app_state() -> (MemoryStore, AppState) {
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), None);
        (store, state)
    }

    /// Create a test `AppState` with a transform client attached.
    #[must_use]
    pub fn test_app_state_with_transform(transform: Arc<dyn TransformImage>) -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), Some(transform))
    }
}
