//! HTTP server implementation for the API

use anyhow::{Context, Result};
use axum::{
    extract::{RawQuery, State},
    http::{header, Method},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use super::models::{LanguagesQuery, TranscriptQuery};
use crate::transcript::TranscriptService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranscriptService>,
    pub default_language: Arc<str>,
}

impl AppState {
    pub fn new(service: Arc<TranscriptService>, default_language: &str) -> Self {
        Self {
            service,
            default_language: Arc::from(default_language),
        }
    }
}

/// Build the application router with its middleware
pub fn build_router(state: AppState) -> Router {
    // Browser clients call the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/", get(health_handler))
        .route("/api/health", get(health_handler))
        // Transcript endpoints
        .route("/transcript", get(transcript_handler))
        .route("/transcript/languages", get(languages_handler))
        // Add state and middleware
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(state: AppState, bind_address: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("🌐 API server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    Json(handlers::health_check())
}

/// Transcript handler
async fn transcript_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let query = TranscriptQuery::parse(query.as_deref());
    handlers::get_transcript(&state.service, query, &state.default_language).await
}

/// Available languages handler
async fn languages_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let query = LanguagesQuery::parse(query.as_deref());
    handlers::get_available_languages(&state.service, query).await
}
