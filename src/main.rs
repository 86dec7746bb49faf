use std::sync::Arc;

use inkboard::store::{DocumentStore, MemoryStore, PgStore};
use inkboard::transform::OpenAiImageClient;
use inkboard::{db, routes, state};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Document store: Postgres when configured, otherwise the in-memory
    // mock database (documents vanish on restart).
    let store: Arc<dyn DocumentStore> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = db::init_pool(&database_url)
                .await
                .expect("database init failed");
            tracing::info!("document store backed by Postgres");
            Arc::new(PgStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set — using in-memory document store");
            Arc::new(MemoryStore::new())
        }
    };

    // Transform client (non-fatal: the AI button is disabled if config missing).
    let transform = match OpenAiImageClient::from_env() {
        Ok(client) => Some(Arc::new(client) as Arc<dyn inkboard::transform::TransformImage>),
        Err(e) => {
            tracing::warn!(error = %e, "transform client not configured — AI transform disabled");
            None
        }
    };

    let state = state::AppState::new(store, transform);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "inkboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
