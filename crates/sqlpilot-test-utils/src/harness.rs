// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full request path (stores, pipeline, query
//! service, router) around a [`MockCompletion`] and a [`RecordingObserver`].

use std::sync::Arc;

use sqlpilot_core::{SqlPilotError, SqlResult};
use sqlpilot_gateway::{AppState, QueryService};
use sqlpilot_pipeline::{GenerationPipeline, PipelineSettings};
use sqlpilot_storage::{MemoryStorage, SqliteStorage, Stores};

use crate::mock_completion::MockCompletion;
use crate::recording_observer::RecordingObserver;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    mock: Option<MockCompletion>,
    settings: PipelineSettings,
    max_messages: usize,
    sqlite: bool,
    default_schema: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            mock: None,
            settings: PipelineSettings::default(),
            max_messages: sqlpilot_storage::DEFAULT_MAX_MESSAGES,
            sqlite: false,
            default_schema: None,
        }
    }

    /// Scripted completion replies, consumed in call order.
    pub fn with_mock_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    /// Use a preconfigured mock; overrides `with_mock_responses`.
    pub fn with_mock(mut self, mock: MockCompletion) -> Self {
        self.mock = Some(mock);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Back the stores with SQLite in a temp directory instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Seed text for the `default` schema entry.
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    pub async fn build(self) -> Result<TestHarness, SqlPilotError> {
        let (stores, temp_dir) = if self.sqlite {
            let temp_dir =
                tempfile::TempDir::new().map_err(|e| SqlPilotError::Storage { source: e.into() })?;
            let path = temp_dir.path().join("sqlpilot-test.db");
            let storage =
                SqliteStorage::open(path.to_string_lossy().into_owned(), self.max_messages)
                    .await?;
            (Stores::shared(Arc::new(storage)), Some(temp_dir))
        } else {
            let storage = MemoryStorage::new(self.max_messages);
            (Stores::shared(Arc::new(storage)), None)
        };

        let mock = Arc::new(
            self.mock
                .unwrap_or_else(|| MockCompletion::with_responses(self.responses)),
        );
        let observer = Arc::new(RecordingObserver::new());
        let pipeline = Arc::new(
            GenerationPipeline::new(mock.clone())
                .with_observer(observer.clone())
                .with_settings(self.settings),
        );
        let service = Arc::new(
            QueryService::new(pipeline.clone(), stores.clone())
                .with_default_schema_seed(self.default_schema),
        );

        Ok(TestHarness {
            mock,
            observer,
            pipeline,
            service,
            stores,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete sqlpilot stack with a mock completion provider.
pub struct TestHarness {
    pub mock: Arc<MockCompletion>,
    pub observer: Arc<RecordingObserver>,
    pub pipeline: Arc<GenerationPipeline>,
    pub service: Arc<QueryService>,
    pub stores: Stores,
    /// Kept alive so the SQLite file outlives the harness.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// One conversational turn through the query service.
    pub async fn query(&self, session_id: &str, message: &str) -> Result<SqlResult, SqlPilotError> {
        self.service.query(session_id, message, None).await
    }

    /// The HTTP router over this harness's service.
    pub fn router(&self) -> axum::Router {
        sqlpilot_gateway::router(AppState::new(self.service.clone()))
    }
}
