// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter for OpenAI-compatible `/chat/completions` endpoints.
//!
//! Works against OpenAI itself and against hosted or local servers that
//! mirror its API (vLLM, llama.cpp, Ollama's `/v1`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use sqlpilot_config::ProviderConfig;
use sqlpilot_core::{
    AdapterType, CompletionAdapter, CompletionRequest, HealthStatus, PluginAdapter,
    SqlPilotError,
};

use crate::http::{JsonClient, endpoint};
use crate::resolve_api_key;
use crate::types::{ApiMessage, ChatRequest, ChatResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    http: JsonClient,
    model: String,
}

impl OpenAiCompletion {
    /// `api_key` may be empty for local servers that do not authenticate.
    pub fn new(
        api_key: &str,
        model: String,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, SqlPilotError> {
        let mut headers = HeaderMap::new();
        if !api_key.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                SqlPilotError::Config(format!("invalid API key header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = JsonClient::new(
            "OpenAI",
            endpoint(base_url, "chat/completions"),
            headers,
            timeout,
            max_retries,
        )?;
        Ok(Self { http, model })
    }

    /// Build from `[provider]` settings, falling back to `OPENAI_API_KEY`.
    ///
    /// A custom `base_url` without any key is allowed.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SqlPilotError> {
        let resolved = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV);
        let api_key = match (&config.base_url, resolved) {
            (_, Ok(key)) => key,
            (Some(_), Err(_)) => String::new(),
            (None, Err(e)) => return Err(e),
        };
        Self::new(
            &api_key,
            config.model.clone(),
            config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.http = self.http.with_retry_delay(delay);
        self
    }
}

#[async_trait]
impl PluginAdapter for OpenAiCompletion {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, SqlPilotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, SqlPilotError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: request
                .messages
                .into_iter()
                .map(|m| ApiMessage {
                    role: m.role.to_string(),
                    content: m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
        };

        let response: ChatResponse = self.http.post(&body).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SqlPilotError::provider("OpenAI response contained no choices"))?;
        tracing::debug!(finish_reason = ?choice.finish_reason, "openai completion");
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlpilot_core::ChatMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_adapter(base_url: &str, key: &str) -> OpenAiCompletion {
        OpenAiCompletion::new(key, "gpt-4o-mini".into(), base_url, Duration::from_secs(5), 1)
            .unwrap()
            .with_retry_delay(Duration::from_millis(10))
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system(
                    "Explain this SQL query in simple terms for someone learning SQL.",
                ),
                ChatMessage::user("SELECT 1 FROM t"),
            ],
            max_tokens: 300,
        }
    }

    fn chat_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn complete_keeps_system_message_inline() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 300,
                "messages": [
                    {"role": "system", "content": "Explain this SQL query in simple terms for someone learning SQL."},
                    {"role": "user", "content": "SELECT 1 FROM t"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("It selects 1.")))
            .expect(1)
            .mount(&server)
            .await;

        let text = test_adapter(&server.uri(), "sk-test").complete(request()).await.unwrap();
        assert_eq!(text, "It selects 1.");
    }

    #[tokio::test]
    async fn empty_choices_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = test_adapter(&server.uri(), "").complete(request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit reached", "type": "requests"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("ok")))
            .mount(&server)
            .await;

        let text = test_adapter(&server.uri(), "k").complete(request()).await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn non_json_error_body_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = test_adapter(&server.uri(), "bad").complete(request()).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"), "got: {msg}");
        assert!(msg.contains("unauthorized"), "got: {msg}");
    }

    #[test]
    fn custom_base_url_needs_no_key() {
        let config = ProviderConfig {
            kind: sqlpilot_config::ProviderKind::Openai,
            api_key: None,
            base_url: Some("http://localhost:11434/v1".into()),
            ..ProviderConfig::default()
        };
        assert!(OpenAiCompletion::from_config(&config).is_ok());
    }
}
