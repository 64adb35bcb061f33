// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`PipelineObserver`] that emits structured `tracing` events.

use sqlpilot_core::{PipelineObserver, SqlResult, ValidationResult};
use tracing::{debug, info, warn};

/// Logs each stage transition under the `sqlpilot_pipeline::observer` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_generate(&self, candidate: &str) {
        debug!(stage = "generate", candidate, "candidate query produced");
    }

    fn on_validate(&self, candidate: &str, result: &ValidationResult) {
        if result.valid {
            debug!(stage = "validate", "candidate passed validation");
        } else {
            info!(
                stage = "validate",
                candidate,
                error = result.error.as_deref().unwrap_or_default(),
                "candidate rejected"
            );
        }
    }

    fn on_retry(&self, failed_query: &str, error: &str) {
        info!(stage = "retry", failed_query, error, "requesting corrected query");
    }

    fn on_validate_retry(&self, retry_query: &str, result: &ValidationResult) {
        if result.valid {
            info!(stage = "validate_retry", "retry query passed validation");
        } else {
            warn!(
                stage = "validate_retry",
                retry_query,
                error = result.error.as_deref().unwrap_or_default(),
                "retry query rejected"
            );
        }
    }

    fn on_explain(&self, _query: &str, explanation: &str) {
        debug!(
            stage = "explain",
            explanation_len = explanation.len(),
            "explanation produced"
        );
    }

    fn on_optimize(&self, _query: &str, suggestions: &[String]) {
        debug!(
            stage = "optimize",
            count = suggestions.len(),
            "optimizations produced"
        );
    }

    fn on_done(&self, result: &SqlResult) {
        debug!(stage = "done", confidence = result.confidence, "pipeline finished");
    }

    fn on_failed(&self, result: &SqlResult) {
        warn!(
            stage = "failed",
            error = result.error.as_deref().unwrap_or_default(),
            "pipeline gave up"
        );
    }
}
