//! HTTP document store — a `DocumentStore` speaking this crate's own
//! document API, for a bridge running apart from the server process.

use std::time::Duration;

use super::{DocumentStore, SaveAck, StoreError};
use crate::record::Snapshot;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Build a client for a server at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn document_endpoint(&self, id: &str) -> String {
        format!("{}/api/document/{id}", self.base_url)
    }
}

#[async_trait::async_trait]
impl DocumentStore for HttpStore {
    async fn get_document(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let response = self
            .http
            .get(self.document_endpoint(id))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected { status, body });
        }

        // The server answers JSON `null` for a never-saved document.
        response
            .json::<Option<Snapshot>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn save_document(&self, id: &str, snapshot: &Snapshot) -> Result<SaveAck, StoreError> {
        let response = self
            .http
            .put(self.document_endpoint(id))
            .json(snapshot)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected { status, body });
        }

        response
            .json::<SaveAck>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
