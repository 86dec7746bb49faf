//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the document API and the drawing-transform endpoint
//! under a single Axum router. The document endpoints are the remote store
//! surface the sync bridge's `HttpStore` talks to.

pub mod documents;
pub mod transform;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router over the injected state.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/document/{id}",
            get(documents::get_document).put(documents::save_document),
        )
        .route("/api/transform-drawing", post(transform::transform_drawing))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
