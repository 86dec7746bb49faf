//! Document API routes — keyed latest-snapshot get and save.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::warn;

use crate::record::Snapshot;
use crate::state::AppState;
use crate::store::StoreError;

/// `GET /api/document/:id` — latest snapshot, or JSON `null` when the
/// document has never been saved.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Snapshot>>, StatusCode> {
    state
        .store
        .get_document(&id)
        .await
        .map(Json)
        .map_err(store_error_to_status)
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

/// `PUT /api/document/:id` — replace the latest snapshot.
pub async fn save_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<SaveResponse>, StatusCode> {
    if let Err(e) = snapshot.validate() {
        warn!(error = %e, id, "rejected invalid snapshot");
        return Err(StatusCode::BAD_REQUEST);
    }

    let ack = state
        .store
        .save_document(&id, &snapshot)
        .await
        .map_err(store_error_to_status)?;

    Ok(Json(SaveResponse { success: ack.success }))
}

pub(crate) fn store_error_to_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::Transport(_) | StoreError::Rejected { .. } => StatusCode::BAD_GATEWAY,
        StoreError::Decode(_) | StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;
