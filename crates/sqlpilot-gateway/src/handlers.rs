// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the sqlpilot API.
//!
//! Handles POST /api/query, GET /api/conversation, POST /api/conversation/clear,
//! POST /api/schema and GET /health.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlpilot_core::{HealthStatus, SqlPilotError};
use sqlpilot_storage::DEFAULT_SCHEMA_NAME;
use tracing::{error, warn};

use crate::server::AppState;

/// Request body for POST /api/query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub message: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    /// Schema text for this request only; the cached default is used otherwise.
    #[serde(default)]
    pub schema: Option<String>,
}

/// Query string for GET /api/conversation.
#[derive(Debug, Deserialize)]
pub struct ConversationParams {
    #[serde(default)]
    pub id: Option<String>,
}

/// Request body for POST /api/conversation/clear.
#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

/// Request body for POST /api/schema.
#[derive(Debug, Deserialize)]
pub struct SchemaRequest {
    pub schema: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a service failure to a status code and `{error}` body.
fn service_error(err: SqlPilotError) -> Response {
    match err {
        SqlPilotError::InvalidRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        SqlPilotError::Timeout { .. } => {
            warn!(error = %err, "request timed out");
            error_response(StatusCode::GATEWAY_TIMEOUT, err.to_string())
        }
        other => {
            error!(error = %other, "request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn rejection(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), rejection.body_text())
}

/// POST /api/query
///
/// Runs one conversational turn and returns the `SqlResult`. A failed
/// validation is still a 200: the result carries the error.
pub async fn post_query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => return rejection(e),
    };

    match state
        .service
        .query(&body.conversation_id, &body.message, body.schema.as_deref())
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /api/conversation?id=...
///
/// Returns the session window as a bare JSON array, oldest first.
pub async fn get_conversation(
    State(state): State<AppState>,
    Query(params): Query<ConversationParams>,
) -> Response {
    let Some(id) = params.id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing conversation ID").into_response();
    };

    match state.service.history(&id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => service_error(e),
    }
}

/// POST /api/conversation/clear
pub async fn post_clear(
    State(state): State<AppState>,
    body: Result<Json<ClearRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => return rejection(e),
    };

    match state.service.clear(&body.conversation_id).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => service_error(e),
    }
}

/// POST /api/schema
///
/// Stores a schema under `name` (default `"default"`), replacing any
/// previous value.
pub async fn post_schema(
    State(state): State<AppState>,
    body: Result<Json<SchemaRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => return rejection(e),
    };
    let name = body
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_SCHEMA_NAME);

    match state.service.save_schema(name, &body.schema).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /health
///
/// 200 `ok` when the provider and store are healthy, 503 `unhealthy` otherwise.
pub async fn get_health(State(state): State<AppState>) -> Response {
    let (code, status, reason) = match state.service.health().await {
        HealthStatus::Healthy => (StatusCode::OK, "ok", None),
        HealthStatus::Unhealthy(reason) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
    };
    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        reason,
    };
    (code, Json(body)).into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
