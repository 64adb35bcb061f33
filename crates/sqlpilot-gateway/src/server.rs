// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use sqlpilot_core::SqlPilotError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::service::QueryService;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<QueryService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router.
///
/// Routes:
/// - POST /api/query
/// - GET /api/conversation?id=...
/// - POST /api/conversation/clear
/// - POST /api/schema
/// - GET /health
///
/// Anything else, including a known path with the wrong method, answers
/// 404 `Not Found`.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/query", post(handlers::post_query))
        .route("/api/conversation", get(handlers::get_conversation))
        .route("/api/conversation/clear", post(handlers::post_clear))
        .route("/api/schema", post(handlers::post_schema));

    Router::new()
        .route("/health", get(handlers::get_health))
        .merge(api_routes)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), SqlPilotError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SqlPilotError::Internal(format!("failed to bind server to {addr}: {e}")))?;

    tracing::info!("sqlpilot listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SqlPilotError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

