// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route-level tests driven through `tower::ServiceExt::oneshot`.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlpilot_storage::DEFAULT_SCHEMA;
use sqlpilot_test_utils::{MockCompletion, TestHarness};
use tower::ServiceExt;

async fn send(harness: &TestHarness, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = harness.router().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn query_returns_result_and_records_both_turns() {
    let harness = TestHarness::builder()
        .with_mock_responses([
            "SELECT * FROM customers",
            "Lists all customers.",
            "Select specific columns",
        ])
        .build()
        .await
        .unwrap();

    let (status, body) = send(
        &harness,
        post_json(
            "/api/query",
            json!({"message": "show all customers", "conversationId": "c-1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let result = json_body(&body);
    assert_eq!(result["query"], "SELECT * FROM customers");
    assert_eq!(result["confidence"], 0.95);
    assert!(result.get("error").is_none());

    let (status, body) = send(&harness, get("/api/conversation?id=c-1")).await;
    assert_eq!(status, StatusCode::OK);
    let messages = json_body(&body).as_array().unwrap().clone();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "show all customers");
    assert_eq!(messages[1]["role"], "assistant");
    let stored: Value = serde_json::from_str(messages[1]["content"].as_str().unwrap()).unwrap();
    assert_eq!(stored, result);
}

#[tokio::test]
async fn query_without_schema_uses_cached_default() {
    let harness = TestHarness::builder().build().await.unwrap();

    send(
        &harness,
        post_json("/api/query", json!({"message": "q", "conversationId": "c"})),
    )
    .await;

    let generate = &harness.mock.requests().await[0].messages[0].content;
    assert!(generate.contains(DEFAULT_SCHEMA));
}

#[tokio::test]
async fn saved_schema_replaces_default() {
    let harness = TestHarness::builder().build().await.unwrap();
    let schema = "CREATE TABLE pets (id INTEGER PRIMARY KEY, name TEXT);";

    let (status, body) = send(&harness, post_json("/api/schema", json!({"schema": schema}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"success": true}));

    send(
        &harness,
        post_json("/api/query", json!({"message": "list pets", "conversationId": "c"})),
    )
    .await;
    let generate = &harness.mock.requests().await[0].messages[0].content;
    assert!(generate.contains(schema));
    assert!(!generate.contains("CREATE TABLE customers"));
}

#[tokio::test]
async fn request_schema_takes_precedence() {
    let harness = TestHarness::builder().build().await.unwrap();
    let schema = "CREATE TABLE invoices (id INTEGER);";

    send(
        &harness,
        post_json(
            "/api/query",
            json!({"message": "q", "conversationId": "c", "schema": schema}),
        ),
    )
    .await;
    let generate = &harness.mock.requests().await[0].messages[0].content;
    assert!(generate.contains(schema));
}

#[tokio::test]
async fn validation_failure_is_still_ok_status() {
    let harness = TestHarness::builder()
        .with_mock_responses(["DROP TABLE customers", "SELECT 1"])
        .build()
        .await
        .unwrap();

    let (status, body) = send(
        &harness,
        post_json("/api/query", json!({"message": "q", "conversationId": "c"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let result = json_body(&body);
    assert_eq!(result["confidence"], 0.0);
    assert_eq!(result["error"], "Missing FROM clause");
}

#[tokio::test]
async fn provider_failure_maps_to_500() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.mock.add_error("upstream unavailable").await;

    let (status, body) = send(
        &harness,
        post_json("/api/query", json!({"message": "q", "conversationId": "c"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json_body(&body)["error"].as_str().unwrap().to_string();
    assert!(error.contains("upstream unavailable"), "got: {error}");
}

#[tokio::test]
async fn malformed_query_body_is_rejected() {
    let harness = TestHarness::builder().build().await.unwrap();

    let request = Request::post("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&harness, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].is_string());

    let (status, _) = send(&harness, post_json("/api/query", json!({"message": "q"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(harness.mock.call_count().await, 0);
}

#[tokio::test]
async fn conversation_without_id_is_bad_request() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, body) = send(&harness, get("/api/conversation")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Missing conversation ID");
}

#[tokio::test]
async fn clear_empties_the_window() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.query("c-9", "show all customers").await.unwrap();

    let (status, body) = send(
        &harness,
        post_json("/api/conversation/clear", json!({"conversationId": "c-9"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"success": true}));

    let (_, body) = send(&harness, get("/api/conversation?id=c-9")).await;
    assert_eq!(json_body(&body), json!([]));
}

#[tokio::test]
async fn health_reports_version() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, body) = send(&harness, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health = json_body(&body);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    assert!(health.get("reason").is_none());
}

#[tokio::test]
async fn health_reports_unhealthy_provider() {
    let harness = TestHarness::builder()
        .with_mock(MockCompletion::new().with_unhealthy("upstream unreachable"))
        .build()
        .await
        .unwrap();
    let (status, body) = send(&harness, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let health = json_body(&body);
    assert_eq!(health["status"], "unhealthy");
    assert_eq!(health["reason"], "mock-completion: upstream unreachable");
}

#[tokio::test]
async fn health_checks_sqlite_store() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    let (status, body) = send(&harness, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let harness = TestHarness::builder().build().await.unwrap();
    let (status, body) = send(&harness, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Not Found");
}

#[tokio::test]
async fn known_route_with_wrong_method_is_404() {
    let harness = TestHarness::builder().build().await.unwrap();
    for request in [
        get("/api/query"),
        post_json("/api/conversation", json!({})),
        get("/api/schema"),
        post_json("/health", json!({})),
    ] {
        let (status, body) = send(&harness, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"Not Found");
    }
}

#[tokio::test]
async fn cors_preflight_is_permitted() {
    let harness = TestHarness::builder().build().await.unwrap();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/query")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = harness.router().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn history_window_keeps_last_twenty_messages() {
    let harness = TestHarness::builder().build().await.unwrap();
    for i in 0..11 {
        harness.query("busy", &format!("request {i}")).await.unwrap();
    }

    let history = harness.service.history("busy").await.unwrap();
    assert_eq!(history.len(), 20);
    // 22 appends: the first user/assistant pair fell out of the window.
    assert_eq!(history[0].content, "request 1");
}

#[tokio::test]
async fn sqlite_backed_harness_serves_queries() {
    let harness = TestHarness::builder()
        .with_sqlite()
        .with_mock_responses(["SELECT id FROM orders", "Order ids.", "Index"])
        .build()
        .await
        .unwrap();

    let result = harness.query("s", "order ids").await.unwrap();
    assert_eq!(result.query, "SELECT id FROM orders");
    assert_eq!(harness.service.history("s").await.unwrap().len(), 2);

    // Closing checkpoints the WAL; the store keeps serving reads.
    harness.service.close().await.unwrap();
    assert_eq!(harness.service.history("s").await.unwrap().len(), 2);
}
