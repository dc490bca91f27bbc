//! # REST Surface
//!
//! The HTTP plumbing around the core: an axum router exposing the uniform
//! operation set plus the health and availability endpoints.
//!
//! ## Endpoints
//!
//! - `GET  /health` — service status, version, available assistants, uptime
//! - `POST /chat` — free-form conversation with an assistant
//! - `POST /code/explain` — code explanation
//! - `POST /code/modify` — instruction-driven code modification
//! - `POST /git/commit` — commit-message generation
//! - `GET  /assistants` — per-assistant availability
//!
//! Operation endpoints answer with the normalized envelope and HTTP 200
//! even when the underlying tool fails; 404/400 are reserved for requests
//! that name an unknown assistant or an unsupported operation.

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub mod handlers;
pub mod models;

pub use handlers::AppState;

/// Build the gateway router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/code/explain", post(handlers::explain_code))
        .route("/code/modify", post(handlers::modify_code))
        .route("/git/commit", post(handlers::generate_commit))
        .route("/assistants", get(handlers::list_assistants))
        .with_state(state)
}

/// Bind the configured address and serve until shutdown
pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
