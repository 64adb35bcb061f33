// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One conversational turn: record the request, run the pipeline, record
//! the answer. Shared by the HTTP routes and the `ask` command.

use std::sync::Arc;
use std::time::Duration;

use sqlpilot_core::{
    ChatMessage, ConversationStore, GenerationRequest, HealthStatus, Message, PluginAdapter, Role,
    SchemaStore, SqlPilotError, SqlResult,
};
use sqlpilot_pipeline::GenerationPipeline;
use sqlpilot_storage::{Stores, resolve_default_schema};
use tracing::{debug, info, warn};

/// Binds a pipeline to the conversation and schema stores.
pub struct QueryService {
    pipeline: Arc<GenerationPipeline>,
    conversations: Arc<dyn ConversationStore>,
    schemas: Arc<dyn SchemaStore>,
    default_schema_seed: Option<String>,
    timeout: Option<Duration>,
}

impl QueryService {
    pub fn new(pipeline: Arc<GenerationPipeline>, stores: Stores) -> Self {
        Self {
            pipeline,
            conversations: stores.conversations,
            schemas: stores.schemas,
            default_schema_seed: None,
            timeout: None,
        }
    }

    /// Schema text used instead of the built-in one when seeding `default`.
    pub fn with_default_schema_seed(mut self, seed: Option<String>) -> Self {
        self.default_schema_seed = seed;
        self
    }

    /// Upper bound on a single pipeline run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run one turn for `session_id`.
    ///
    /// The user message is appended before history is read, so the pipeline
    /// sees it as the newest history entry. A blank `schema` falls back to
    /// the cached default. The result is stored as an assistant message
    /// holding its JSON form.
    pub async fn query(
        &self,
        session_id: &str,
        message: &str,
        schema: Option<&str>,
    ) -> Result<SqlResult, SqlPilotError> {
        if session_id.is_empty() {
            return Err(SqlPilotError::InvalidRequest(
                "conversationId must not be empty".into(),
            ));
        }

        self.conversations
            .append(session_id, Role::User, message)
            .await?;
        let history: Vec<ChatMessage> = self
            .conversations
            .history(session_id)
            .await?
            .iter()
            .map(ChatMessage::from)
            .collect();

        let schema = match schema.filter(|s| !s.is_empty()) {
            Some(schema) => schema.to_string(),
            None => {
                resolve_default_schema(self.schemas.as_ref(), self.default_schema_seed.as_deref())
                    .await?
            }
        };

        let request = GenerationRequest {
            user_message: message.to_string(),
            history,
            schema,
        };
        debug!(session_id, history_len = request.history.len(), "running pipeline");

        let result = match self.timeout {
            Some(duration) => tokio::time::timeout(duration, self.pipeline.generate(&request))
                .await
                .map_err(|_| SqlPilotError::Timeout { duration })??,
            None => self.pipeline.generate(&request).await?,
        };

        let stored = serde_json::to_string(&result)?;
        self.conversations
            .append(session_id, Role::Assistant, &stored)
            .await?;
        info!(session_id, failed = result.is_failure(), "query answered");
        Ok(result)
    }

    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, SqlPilotError> {
        self.conversations.history(session_id).await
    }

    pub async fn clear(&self, session_id: &str) -> Result<(), SqlPilotError> {
        self.conversations.clear(session_id).await
    }

    pub async fn save_schema(&self, name: &str, schema: &str) -> Result<(), SqlPilotError> {
        self.schemas.put_schema(name, schema).await
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    /// Combined health of the completion provider and the conversation
    /// store. The first unhealthy adapter decides the outcome.
    pub async fn health(&self) -> HealthStatus {
        let (completion, store) = tokio::join!(
            check_adapter(self.pipeline.completion()),
            check_adapter(self.conversations.as_ref()),
        );
        for status in [completion, store] {
            if let HealthStatus::Unhealthy(reason) = status {
                warn!(%reason, "health check failed");
                return HealthStatus::Unhealthy(reason);
            }
        }
        HealthStatus::Healthy
    }

    /// Flush the conversation store. Call once the server has stopped.
    pub async fn close(&self) -> Result<(), SqlPilotError> {
        self.conversations.close().await
    }
}

async fn check_adapter<A: PluginAdapter + ?Sized>(adapter: &A) -> HealthStatus {
    let status = match adapter.health_check().await {
        Ok(HealthStatus::Unhealthy(reason)) => {
            HealthStatus::Unhealthy(format!("{}: {reason}", adapter.name()))
        }
        Ok(status) => status,
        Err(e) => HealthStatus::Unhealthy(format!("{}: {e}", adapter.name())),
    };
    debug!(
        adapter = adapter.name(),
        kind = %adapter.adapter_type(),
        version = %adapter.version(),
        healthy = status.is_healthy(),
        "adapter health checked"
    );
    status
}
