// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation pipeline: drives [`PipelineState`] to a terminal state.
//!
//! Every completion call is a suspension point; nothing else awaits. A
//! completion failure aborts the run and propagates to the caller, while a
//! validation failure is data and ends in `Failed`.

use std::sync::Arc;

use sqlpilot_config::PipelineConfig;
use sqlpilot_core::{
    CompletionAdapter, CompletionRequest, GenerationRequest, NoopObserver, PipelineObserver,
    SqlPilotError, SqlResult,
};
use tracing::{debug, info};

use crate::machine::PipelineState;
use crate::prompt::{PromptBuilder, Stage};
use crate::validator::{clean_sql_response, validate_sql};

/// Token caps and tuning knobs for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub history_window: usize,
    pub generate_max_tokens: u32,
    pub retry_max_tokens: u32,
    pub explain_max_tokens: u32,
    pub optimize_max_tokens: u32,
    /// Run explain and optimize concurrently. Results are identical either way.
    pub concurrent_enrichment: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            history_window: config.history_window,
            generate_max_tokens: config.generate_max_tokens,
            retry_max_tokens: config.retry_max_tokens,
            explain_max_tokens: config.explain_max_tokens,
            optimize_max_tokens: config.optimize_max_tokens,
            concurrent_enrichment: config.concurrent_enrichment,
        }
    }
}

/// Turns a natural-language request into a validated query with commentary.
///
/// Holds no per-request state, so one instance serves concurrent requests.
pub struct GenerationPipeline {
    completion: Arc<dyn CompletionAdapter>,
    observer: Arc<dyn PipelineObserver>,
    prompts: PromptBuilder,
    settings: PipelineSettings,
}

impl GenerationPipeline {
    pub fn new(completion: Arc<dyn CompletionAdapter>) -> Self {
        let settings = PipelineSettings::default();
        Self {
            completion,
            observer: Arc::new(NoopObserver),
            prompts: PromptBuilder::new(settings.history_window),
            settings,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.prompts = PromptBuilder::new(settings.history_window);
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn completion(&self) -> &dyn CompletionAdapter {
        self.completion.as_ref()
    }

    /// Run the state machine from `Generate` to `Done` or `Failed`.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<SqlResult, SqlPilotError> {
        let mut state = PipelineState::Generate;
        while !state.is_terminal() {
            debug!(state = %state, "pipeline step");
            state = self.advance(state, request).await?;
        }

        match state {
            PipelineState::Done(result) => {
                info!(
                    query_len = result.query.len(),
                    optimizations = result.optimizations.len(),
                    "sql generated"
                );
                self.observer.on_done(&result);
                Ok(result)
            }
            PipelineState::Failed(result) => {
                info!(error = ?result.error, "sql generation failed validation twice");
                self.observer.on_failed(&result);
                Ok(result)
            }
            other => Err(SqlPilotError::Internal(format!(
                "pipeline stopped in non-terminal state {other}"
            ))),
        }
    }

    /// Perform one transition. Terminal states are returned unchanged.
    pub async fn advance(
        &self,
        state: PipelineState,
        request: &GenerationRequest,
    ) -> Result<PipelineState, SqlPilotError> {
        let next = match state {
            PipelineState::Generate => {
                let raw = self
                    .complete(Stage::Generate, request, self.settings.generate_max_tokens)
                    .await?;
                let candidate = clean_sql_response(raw.trim());
                self.observer.on_generate(&candidate);
                PipelineState::Validate { candidate }
            }

            PipelineState::Validate { candidate } => {
                let validation = validate_sql(&candidate);
                self.observer.on_validate(&candidate, &validation);
                match validation.error {
                    None => PipelineState::Explain { query: candidate },
                    Some(error) => PipelineState::Retry { candidate, error },
                }
            }

            PipelineState::Retry { candidate, error } => {
                self.observer.on_retry(&candidate, &error);
                let stage = Stage::Retry {
                    failed_query: &candidate,
                    error: &error,
                };
                // The retry answer is only trimmed; fences are not stripped here.
                let retry_query = self
                    .complete(stage, request, self.settings.retry_max_tokens)
                    .await?
                    .trim()
                    .to_string();
                PipelineState::ValidateRetry {
                    candidate,
                    retry_query,
                }
            }

            PipelineState::ValidateRetry {
                candidate,
                retry_query,
            } => {
                let validation = validate_sql(&retry_query);
                self.observer.on_validate_retry(&retry_query, &validation);
                match validation.error {
                    None => PipelineState::Explain { query: retry_query },
                    Some(error) => PipelineState::Failed(SqlResult::failed(candidate, Some(error))),
                }
            }

            PipelineState::Explain { query } if self.settings.concurrent_enrichment => {
                let (explanation, optimizations) = tokio::try_join!(
                    self.explain(&query, request),
                    self.optimize(&query, request)
                )?;
                PipelineState::Done(SqlResult::success(query, explanation, optimizations))
            }

            PipelineState::Explain { query } => {
                let explanation = self.explain(&query, request).await?;
                PipelineState::Optimize { query, explanation }
            }

            PipelineState::Optimize { query, explanation } => {
                let optimizations = self.optimize(&query, request).await?;
                PipelineState::Done(SqlResult::success(query, explanation, optimizations))
            }

            terminal @ (PipelineState::Done(_) | PipelineState::Failed(_)) => terminal,
        };

        Ok(next)
    }

    async fn explain(
        &self,
        query: &str,
        request: &GenerationRequest,
    ) -> Result<String, SqlPilotError> {
        let explanation = self
            .complete(
                Stage::Explain { query },
                request,
                self.settings.explain_max_tokens,
            )
            .await?
            .trim()
            .to_string();
        self.observer.on_explain(query, &explanation);
        Ok(explanation)
    }

    async fn optimize(
        &self,
        query: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<String>, SqlPilotError> {
        let raw = self
            .complete(
                Stage::Optimize { query },
                request,
                self.settings.optimize_max_tokens,
            )
            .await?;
        let suggestions = split_suggestions(&raw);
        self.observer.on_optimize(query, &suggestions);
        Ok(suggestions)
    }

    async fn complete(
        &self,
        stage: Stage<'_>,
        request: &GenerationRequest,
        max_tokens: u32,
    ) -> Result<String, SqlPilotError> {
        let messages = self.prompts.build(
            stage,
            &request.schema,
            &request.user_message,
            &request.history,
        );
        debug!(stage = stage.name(), max_tokens, "requesting completion");
        self.completion
            .complete(CompletionRequest {
                messages,
                max_tokens,
            })
            .await
    }
}

/// Non-blank lines of the trimmed response, in order and without dedup.
fn split_suggestions(raw: &str) -> Vec<String> {
    raw.trim()
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
