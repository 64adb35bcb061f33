// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for sqlpilot.

use thiserror::Error;

/// The primary error type used across all sqlpilot adapter traits and core operations.
///
/// Validation failures of generated SQL are NOT errors: they travel inside
/// [`SqlResult::error`](crate::types::SqlResult). This enum covers failures of
/// the surrounding machinery only.
#[derive(Debug, Error)]
pub enum SqlPilotError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Text-completion provider errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller supplied a request the boundary cannot accept.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SqlPilotError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for SqlPilotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {err}"))
    }
}
