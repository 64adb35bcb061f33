// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline observer that records stage transitions for assertions.

use std::sync::Mutex;

use sqlpilot_core::{PipelineObserver, SqlResult, ValidationResult};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Generate { candidate: String },
    Validate { candidate: String, result: ValidationResult },
    Retry { failed_query: String, error: String },
    ValidateRetry { retry_query: String, result: ValidationResult },
    Explain { query: String, explanation: String },
    Optimize { query: String, suggestions: Vec<String> },
    Done(SqlResult),
    Failed(SqlResult),
}

impl PipelineEvent {
    /// Short stage name, handy for asserting on event order.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Validate { .. } => "validate",
            Self::Retry { .. } => "retry",
            Self::ValidateRetry { .. } => "validate_retry",
            Self::Explain { .. } => "explain",
            Self::Optimize { .. } => "optimize",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.lock().iter().map(PipelineEvent::name).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, event: PipelineEvent) {
        self.lock().push(event);
    }

    // A panicking test thread must not hide the events from the others.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PipelineEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_generate(&self, candidate: &str) {
        self.record(PipelineEvent::Generate {
            candidate: candidate.to_string(),
        });
    }

    fn on_validate(&self, candidate: &str, result: &ValidationResult) {
        self.record(PipelineEvent::Validate {
            candidate: candidate.to_string(),
            result: result.clone(),
        });
    }

    fn on_retry(&self, failed_query: &str, error: &str) {
        self.record(PipelineEvent::Retry {
            failed_query: failed_query.to_string(),
            error: error.to_string(),
        });
    }

    fn on_validate_retry(&self, retry_query: &str, result: &ValidationResult) {
        self.record(PipelineEvent::ValidateRetry {
            retry_query: retry_query.to_string(),
            result: result.clone(),
        });
    }

    fn on_explain(&self, query: &str, explanation: &str) {
        self.record(PipelineEvent::Explain {
            query: query.to_string(),
            explanation: explanation.to_string(),
        });
    }

    fn on_optimize(&self, query: &str, suggestions: &[String]) {
        self.record(PipelineEvent::Optimize {
            query: query.to_string(),
            suggestions: suggestions.to_vec(),
        });
    }

    fn on_done(&self, result: &SqlResult) {
        self.record(PipelineEvent::Done(result.clone()));
    }

    fn on_failed(&self, result: &SqlResult) {
        self.record(PipelineEvent::Failed(result.clone()));
    }
}
