// Web front-end
// Single page plus a small JSON API over ChatService

mod handlers;

pub use handlers::{
    handle_clear_history, handle_generate, handle_history, handle_list_models, health_check,
    index, ApiError, AppState, ClearBody, GenerateBody, GenerateReply, HistoryResponse,
    ModelsResponse,
};

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::chat::ChatService;

/// Build the router with every route wired to `service`
pub fn create_router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/models", get(handle_list_models))
        .route("/api/generate", post(handle_generate))
        .route("/api/history/:model", get(handle_history))
        .route("/api/history/:model/clear", post(handle_clear_history))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the front-end until the process is interrupted
pub async fn serve(service: Arc<ChatService>, addr: SocketAddr) -> Result<()> {
    let app = create_router(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
