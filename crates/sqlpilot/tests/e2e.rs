// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete request path.
//!
//! Harness tests run against a scripted completion adapter; the provider
//! tests put a real HTTP adapter behind a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use sqlpilot_config::ProviderConfig;
use sqlpilot_core::Role;
use sqlpilot_gateway::QueryService;
use sqlpilot_pipeline::GenerationPipeline;
use sqlpilot_provider::AnthropicCompletion;
use sqlpilot_storage::{MemoryStorage, Stores};
use sqlpilot_test_utils::TestHarness;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[tokio::test]
async fn show_all_customers_reaches_explain_and_optimize() {
    let harness = TestHarness::builder()
        .with_mock_responses([
            "SELECT * FROM customers",
            "Returns every row of the customers table.",
            "Select only the columns you need\nAdd LIMIT when browsing",
        ])
        .build()
        .await
        .unwrap();

    let result = harness.query("e2e-1", "show all customers").await.unwrap();

    assert_eq!(result.query, "SELECT * FROM customers");
    assert_eq!(result.confidence, 0.95);
    assert_eq!(result.optimizations.len(), 2);
    assert!(!harness.observer.names().contains(&"retry"));
}

#[tokio::test]
async fn follow_up_sees_previous_turn_in_prompt() {
    let harness = TestHarness::builder()
        .with_mock_responses([
            "SELECT * FROM customers",
            "All customers.",
            "Index email",
            "SELECT email FROM customers",
            "Customer emails.",
            "Index email",
        ])
        .build()
        .await
        .unwrap();

    harness.query("e2e-2", "show all customers").await.unwrap();
    harness.query("e2e-2", "only their emails").await.unwrap();

    // Window of 3: previous user turn, previous assistant result, current turn.
    let requests = harness.mock.requests().await;
    let system = &requests[3].messages[0].content;
    let context = system
        .split("Previous conversation context:\n")
        .nth(1)
        .unwrap();
    let lines: Vec<&str> = context.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "user: show all customers");
    assert!(lines[1].starts_with("assistant: {\"query\":\"SELECT * FROM customers\""));
    assert_eq!(lines[2], "user: only their emails");
}

#[tokio::test]
async fn sessions_do_not_share_history() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.query("a", "first").await.unwrap();
    harness.query("b", "second").await.unwrap();

    let a = harness.service.history("a").await.unwrap();
    let b = harness.service.history("b").await.unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
    assert_eq!(a[0].content, "first");
    assert_eq!(b[0].content, "second");
    assert_eq!(a[1].role, Role::Assistant);
}

#[tokio::test]
async fn empty_conversation_id_is_rejected_before_any_call() {
    let harness = TestHarness::builder().build().await.unwrap();
    let err = harness.query("", "show all customers").await.unwrap_err();
    assert!(err.to_string().contains("conversationId"));
    assert_eq!(harness.mock.call_count().await, 0);
}

/// Answers each stage by inspecting the request's token cap.
struct StageResponder;

impl Respond for StageResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let text = match body["max_tokens"].as_u64() {
            Some(500) => "```sql\nSELECT id, email FROM customers\n```",
            Some(300) => "Lists each customer's id and email.",
            _ => "Add an index on customers(email)",
        };
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_e2e",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 8}
        }))
    }
}

fn anthropic_service(base_url: &str) -> QueryService {
    let config = ProviderConfig {
        api_key: Some("sk-ant-e2e".into()),
        base_url: Some(base_url.to_string()),
        ..ProviderConfig::default()
    };
    let completion = AnthropicCompletion::from_config(&config)
        .unwrap()
        .with_retry_delay(Duration::from_millis(10));
    let pipeline = GenerationPipeline::new(Arc::new(completion));
    QueryService::new(
        Arc::new(pipeline),
        Stores::shared(Arc::new(MemoryStorage::default())),
    )
}

#[tokio::test]
async fn anthropic_round_trip_through_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(StageResponder)
        .expect(3)
        .mount(&server)
        .await;

    let service = anthropic_service(&server.uri());
    let result = service
        .query("e2e-http", "customer emails", None)
        .await
        .unwrap();

    assert_eq!(result.query, "SELECT id, email FROM customers");
    assert_eq!(result.explanation, "Lists each customer's id and email.");
    assert_eq!(result.optimizations, vec!["Add an index on customers(email)"]);
}

#[tokio::test]
async fn provider_outage_leaves_only_the_user_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"type": "api_error", "message": "Internal server error"}
        })))
        .mount(&server)
        .await;

    let service = anthropic_service(&server.uri());
    let err = service
        .query("e2e-down", "customer emails", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("api_error"), "got: {err}");

    let history = service.history("e2e-down").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, Role::User);
}
