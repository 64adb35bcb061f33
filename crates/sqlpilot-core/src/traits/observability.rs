// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer trait notified on every pipeline stage transition.

use crate::types::{SqlResult, ValidationResult};

/// Injectable sink for pipeline stage events.
///
/// Every method defaults to a no-op so implementors only override what they
/// record. Methods are synchronous and must not block.
pub trait PipelineObserver: Send + Sync {
    /// The first candidate query was produced (after fence stripping).
    fn on_generate(&self, _candidate: &str) {}

    /// The first candidate was validated.
    fn on_validate(&self, _candidate: &str, _result: &ValidationResult) {}

    /// A retry is about to be requested for a rejected candidate.
    fn on_retry(&self, _failed_query: &str, _error: &str) {}

    /// The retry query was validated.
    fn on_validate_retry(&self, _retry_query: &str, _result: &ValidationResult) {}

    /// An explanation was produced for the working query.
    fn on_explain(&self, _query: &str, _explanation: &str) {}

    /// Optimization suggestions were produced for the working query.
    fn on_optimize(&self, _query: &str, _suggestions: &[String]) {}

    /// The pipeline finished with a valid query.
    fn on_done(&self, _result: &SqlResult) {}

    /// The pipeline gave up after the retry also failed validation.
    fn on_failed(&self, _result: &SqlResult) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
