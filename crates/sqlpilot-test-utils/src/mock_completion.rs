// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion adapter for deterministic testing.
//!
//! `MockCompletion` implements `CompletionAdapter` with scripted replies and
//! records every request it receives, so tests can assert on prompts and
//! token caps without calling a real provider.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sqlpilot_core::{
    AdapterType, CompletionAdapter, CompletionRequest, HealthStatus, PluginAdapter, SqlPilotError,
};

/// Text returned once the scripted queue is exhausted.
pub const DEFAULT_MOCK_RESPONSE: &str = "mock response";

/// Computes a reply from the request; `None` falls through to the queue.
pub type ReplyHandler = Arc<dyn Fn(&CompletionRequest) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error(String),
}

/// A completion adapter that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// [`DEFAULT_MOCK_RESPONSE`] is returned.
#[derive(Default)]
pub struct MockCompletion {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
    handler: Option<ReplyHandler>,
    unhealthy: Option<String>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with the given replies.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(responses.into_iter().map(|r| Reply::Text(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Answer by inspecting each request instead of (or before) the queue.
    ///
    /// Needed when call order is not deterministic, as with concurrent
    /// explanation and optimization.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Option<String> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Report `reason` from every health check.
    pub fn with_unhealthy(mut self, reason: impl Into<String>) -> Self {
        self.unhealthy = Some(reason.into());
        self
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Reply::Text(text.into()));
    }

    /// Queue a provider failure.
    pub async fn add_error(&self, message: impl Into<String>) {
        self.replies.lock().await.push_back(Reply::Error(message.into()));
    }

    /// Every request received so far, in call order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, SqlPilotError> {
        Ok(match &self.unhealthy {
            Some(reason) => HealthStatus::Unhealthy(reason.clone()),
            None => HealthStatus::Healthy,
        })
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, SqlPilotError> {
        let handled = self.handler.as_ref().and_then(|handler| handler(&request));
        self.requests.lock().await.push(request);
        if let Some(text) = handled {
            return Ok(text);
        }

        match self.replies.lock().await.pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Error(message)) => Err(SqlPilotError::provider(message)),
            None => Ok(DEFAULT_MOCK_RESPONSE.to_string()),
        }
    }
}
