//! Drawing-transform route — forwards a drawing payload to the AI image
//! service and answers with the generated image URL.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::AppState;
use crate::transform::TransformError;

#[derive(Deserialize)]
pub struct TransformRequest {
    #[serde(rename = "drawingData")]
    pub drawing_data: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct TransformResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct TransformFailure {
    pub error: String,
}

/// `POST /api/transform-drawing` — run the AI transform.
pub async fn transform_drawing(
    State(state): State<AppState>,
    Json(request): Json<TransformRequest>,
) -> Result<Json<TransformResponse>, (StatusCode, Json<TransformFailure>)> {
    let Some(client) = &state.transform else {
        return Err(failure(&TransformError::NotConfigured));
    };

    match client.transform(&request.drawing_data).await {
        Ok(image_url) => Ok(Json(TransformResponse { image_url })),
        Err(e) => {
            error!(error = %e, "drawing transform failed");
            Err(failure(&e))
        }
    }
}

fn failure(err: &TransformError) -> (StatusCode, Json<TransformFailure>) {
    (
        transform_error_to_status(err),
        Json(TransformFailure { error: "Failed to transform drawing".into() }),
    )
}

pub(crate) fn transform_error_to_status(err: &TransformError) -> StatusCode {
    match err {
        TransformError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        TransformError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
        TransformError::MissingApiKey { .. } | TransformError::HttpClientBuild(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TransformError::ApiRequest(_)
        | TransformError::ApiResponse { .. }
        | TransformError::ApiParse(_)
        | TransformError::EmptyResponse => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
