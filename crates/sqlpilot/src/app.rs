// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by `serve` and `ask`: configuration in, query service out.

use std::sync::Arc;
use std::time::Duration;

use sqlpilot_config::SqlPilotConfig;
use sqlpilot_core::SqlPilotError;
use sqlpilot_gateway::QueryService;
use sqlpilot_pipeline::{GenerationPipeline, PipelineSettings, TracingObserver};
use sqlpilot_provider::build_completion;
use sqlpilot_storage::open_stores;
use tracing::info;

/// Build the query service described by `config`.
pub async fn build_service(config: &SqlPilotConfig) -> Result<QueryService, SqlPilotError> {
    let completion = build_completion(&config.provider)?;
    let stores = open_stores(&config.conversation).await?;
    info!(
        backend = ?config.conversation.backend,
        max_messages = config.conversation.max_messages,
        "conversation store ready"
    );

    let pipeline = GenerationPipeline::new(completion)
        .with_observer(Arc::new(TracingObserver))
        .with_settings(PipelineSettings::from(&config.pipeline));

    let seed = load_schema_seed(config.schema.default_schema_file.as_deref()).await?;

    Ok(QueryService::new(Arc::new(pipeline), stores)
        .with_default_schema_seed(seed)
        .with_timeout(Duration::from_secs(config.server.request_timeout_secs)))
}

/// Read the configured default-schema file, if any.
pub async fn load_schema_seed(path: Option<&str>) -> Result<Option<String>, SqlPilotError> {
    let Some(path) = path else {
        return Ok(None);
    };
    read_schema_file(path).await.map(Some)
}

pub async fn read_schema_file(path: &str) -> Result<String, SqlPilotError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SqlPilotError::Config(format!("cannot read schema file {path}: {e}")))
}
