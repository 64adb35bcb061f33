// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter for the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use sqlpilot_config::ProviderConfig;
use sqlpilot_core::{
    AdapterType, CompletionAdapter, CompletionRequest, HealthStatus, PluginAdapter, Role,
    SqlPilotError,
};
use tracing::debug;

use crate::http::{JsonClient, endpoint};
use crate::resolve_api_key;
use crate::types::{ApiMessage, MessageRequest, MessageResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Sends pipeline prompts to `POST {base_url}/messages`.
///
/// System-role messages are lifted into the top-level `system` field, since
/// the Messages API only accepts user and assistant turns.
#[derive(Debug, Clone)]
pub struct AnthropicCompletion {
    http: JsonClient,
    model: String,
}

impl AnthropicCompletion {
    pub fn new(
        api_key: &str,
        api_version: &str,
        model: String,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, SqlPilotError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                SqlPilotError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                SqlPilotError::Config(format!("invalid API version header value: {e}"))
            })?,
        );

        let http = JsonClient::new(
            "Anthropic",
            endpoint(base_url, "messages"),
            headers,
            timeout,
            max_retries,
        )?;
        Ok(Self { http, model })
    }

    /// Build from `[provider]` settings, falling back to `ANTHROPIC_API_KEY`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SqlPilotError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), API_KEY_ENV)?;
        Self::new(
            &api_key,
            &config.api_version,
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

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_request(&self, request: CompletionRequest) -> MessageRequest {
        let mut system = Vec::new();
        let mut messages = Vec::with_capacity(request.messages.len());
        for message in request.messages {
            match message.role {
                Role::System => system.push(message.content),
                role => messages.push(ApiMessage {
                    role: role.to_string(),
                    content: message.content,
                }),
            }
        }

        MessageRequest {
            model: self.model.clone(),
            messages,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicCompletion {
    fn name(&self) -> &str {
        "anthropic"
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
impl CompletionAdapter for AnthropicCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, SqlPilotError> {
        let body = self.to_request(request);
        let response: MessageResponse = self.http.post(&body).await?;
        if let Some(usage) = &response.usage {
            debug!(
                id = %response.id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = ?response.stop_reason,
                "anthropic completion"
            );
        }
        Ok(response.text())
    }
}
