//! Postgres document store — latest snapshot per document id, upsert
//! semantics, snapshot stored as jsonb.

use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;

use super::{DocumentStore, SaveAck, StoreError};
use crate::record::Snapshot;

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PgStore {
    async fn get_document(&self, id: &str) -> Result<Option<Snapshot>, StoreError> {
        let row: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT snapshot FROM documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Decode(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save_document(&self, id: &str, snapshot: &Snapshot) -> Result<SaveAck, StoreError> {
        let value = serde_json::to_value(snapshot).map_err(|e| StoreError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO documents (id, snapshot, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET snapshot = EXCLUDED.snapshot, updated_at = EXCLUDED.updated_at",
        )
        .bind(id)
        .bind(&value)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;

        Ok(SaveAck { success: true })
    }
}
