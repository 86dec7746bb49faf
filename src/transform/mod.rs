//! AI image transform — turns a drawing selection into a generated image.
//!
//! DESIGN
//! ======
//! The shell and HTTP layer only see [`TransformImage`], an injected trait
//! returning an image URL for a serialized drawing payload. The concrete
//! client ([`openai::OpenAiImageClient`]) talks to an OpenAI-compatible
//! image-generation endpoint. The whole feature is optional: a missing API
//! key disables it with a warning rather than failing startup.

pub mod openai;

pub use openai::{OpenAiImageClient, TransformConfig};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced by the transform service.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// No transform client is configured for this process.
    #[error("transform service not configured")]
    NotConfigured,

    /// The selection cannot be sent for transformation.
    #[error("selection is not transformable: {0}")]
    InvalidSelection(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the transform provider failed.
    #[error("transform request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("transform response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("transform response parse failed: {0}")]
    ApiParse(String),

    /// The provider answered without any image.
    #[error("no image received from transform service")]
    EmptyResponse,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::ErrorCode for TransformError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_TRANSFORM_NOT_CONFIGURED",
            Self::InvalidSelection(_) => "E_INVALID_SELECTION",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. }
        )
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Async seam for the image transform service. Enables mocking in tests.
#[async_trait::async_trait]
pub trait TransformImage: Send + Sync {
    /// Transform a serialized drawing payload into an image URL.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] if the provider request fails, the
    /// response is malformed, or no image comes back.
    async fn transform(&self, drawing: &serde_json::Value) -> Result<String, TransformError>;
}
