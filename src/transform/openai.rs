//! OpenAI image-generation client for the drawing transform.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TransformError, TransformImage};

pub const DEFAULT_TRANSFORM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_SIZE: &str = "512x512";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// The drawing payload itself is not fed into the prompt; the provider is
/// asked for a cleaned-up rendition with a fixed instruction.
const TRANSFORM_PROMPT: &str = "A clean digital transformation of this hand-drawn sketch.";
const IMAGE_COUNT: u32 = 1;

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_size: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl TransformConfig {
    /// Build typed transform config from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`
    ///
    /// Optional:
    /// - `TRANSFORM_BASE_URL`: default OpenAI API base URL
    /// - `TRANSFORM_IMAGE_SIZE`: default `512x512`
    /// - `TRANSFORM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `TRANSFORM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MissingApiKey`] if the key is absent.
    pub fn from_env() -> Result<Self, TransformError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| TransformError::MissingApiKey { var: "OPENAI_API_KEY".into() })?;
        let base_url = std::env::var("TRANSFORM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_TRANSFORM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let image_size = std::env::var("TRANSFORM_IMAGE_SIZE").unwrap_or_else(|_| DEFAULT_IMAGE_SIZE.to_string());

        Ok(Self {
            api_key,
            base_url,
            image_size,
            request_timeout_secs: env_parse_u64("TRANSFORM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse_u64("TRANSFORM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiImageClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    image_size: String,
}

impl OpenAiImageClient {
    /// Build a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, TransformError> {
        Self::from_config(TransformConfig::from_env()?)
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: TransformConfig) -> Result<Self, TransformError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| TransformError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            image_size: config.image_size,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, TransformError> {
        let url = format!("{}/images/generations", self.base_url);
        let body = ImageRequest { prompt, n: IMAGE_COUNT, size: &self.image_size };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransformError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransformError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(TransformError::ApiResponse { status, body: text });
        }

        parse_image_response(&text)
    }
}

#[async_trait::async_trait]
impl TransformImage for OpenAiImageClient {
    async fn transform(&self, drawing: &serde_json::Value) -> Result<String, TransformError> {
        // The payload is acknowledged but not embedded in the prompt.
        debug!(
            payload_bytes = drawing.to_string().len(),
            "received drawing data for transform"
        );
        self.generate(TRANSFORM_PROMPT).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

pub(crate) fn parse_image_response(text: &str) -> Result<String, TransformError> {
    let response: ImageResponse =
        serde_json::from_str(text).map_err(|e| TransformError::ApiParse(e.to_string()))?;
    response
        .data
        .into_iter()
        .find_map(|d| d.url)
        .ok_or(TransformError::EmptyResponse)
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
