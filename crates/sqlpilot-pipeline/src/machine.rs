// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! States of one generation run.
//!
//! `Generate -> Validate -> [Retry -> ValidateRetry] -> Explain -> Optimize -> Done`,
//! with `Failed` reachable only from `ValidateRetry`. Each state owns exactly
//! the data the next transition needs.

use sqlpilot_core::SqlResult;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Generate,
    Validate {
        candidate: String,
    },
    Retry {
        candidate: String,
        error: String,
    },
    ValidateRetry {
        /// Kept because a failed run reports the first candidate.
        candidate: String,
        retry_query: String,
    },
    Explain {
        query: String,
    },
    Optimize {
        query: String,
        explanation: String,
    },
    Done(SqlResult),
    Failed(SqlResult),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done(_) | PipelineState::Failed(_))
    }

    /// Consumes a terminal state, yielding its result.
    pub fn into_result(self) -> Option<SqlResult> {
        match self {
            PipelineState::Done(result) | PipelineState::Failed(result) => Some(result),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Generate => write!(f, "generate"),
            PipelineState::Validate { .. } => write!(f, "validate"),
            PipelineState::Retry { .. } => write!(f, "retry"),
            PipelineState::ValidateRetry { .. } => write!(f, "validate_retry"),
            PipelineState::Explain { .. } => write!(f, "explain"),
            PipelineState::Optimize { .. } => write!(f, "optimize"),
            PipelineState::Done(_) => write!(f, "done"),
            PipelineState::Failed(_) => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display() {
        assert_eq!(PipelineState::Generate.to_string(), "generate");
        assert_eq!(
            PipelineState::ValidateRetry {
                candidate: String::new(),
                retry_query: String::new(),
            }
            .to_string(),
            "validate_retry"
        );
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        let done = PipelineState::Done(SqlResult::success("q".into(), "e".into(), vec![]));
        let failed = PipelineState::Failed(SqlResult::failed("q".into(), None));
        assert!(done.is_terminal());
        assert!(failed.is_terminal());
        assert!(!PipelineState::Generate.is_terminal());
        assert!(
            !PipelineState::Explain {
                query: "q".into()
            }
            .is_terminal()
        );
    }

    #[test]
    fn into_result_only_for_terminal_states() {
        assert!(PipelineState::Generate.into_result().is_none());
        let result = SqlResult::failed("q".into(), Some("Missing FROM clause".into()));
        assert_eq!(
            PipelineState::Failed(result.clone()).into_result(),
            Some(result)
        );
    }
}
