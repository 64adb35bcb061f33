// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the sqlpilot pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Confidence reported for every result that passed validation.
///
/// A fixed placeholder, not a calibrated score.
pub const SUCCESS_CONFIDENCE: f64 = 0.95;

/// Explanation text carried by a result whose retry also failed validation.
pub const FAILED_EXPLANATION: &str = "Failed to generate valid SQL";

/// Author of a conversation message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A message persisted in a conversation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Server-assigned epoch milliseconds.
    pub timestamp: i64,
}

/// A role-tagged message without a timestamp.
///
/// Used both for history snapshots handed to the pipeline and for the
/// message lists sent to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// A request to a text-completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Ordered role-tagged messages.
    pub messages: Vec<ChatMessage>,
    /// Output token cap.
    pub max_tokens: u32,
}

/// Input to one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The natural-language request.
    #[serde(rename = "message")]
    pub user_message: String,
    /// Read-only snapshot of the conversation, oldest first.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// Database schema text the query must target.
    pub schema: String,
}

/// Outcome of the lexical SQL validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }
}

/// The only artifact the pipeline returns to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlResult {
    pub query: String,
    pub explanation: String,
    pub optimizations: Vec<String>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SqlResult {
    /// A result whose query passed validation.
    pub fn success(query: String, explanation: String, optimizations: Vec<String>) -> Self {
        Self {
            query,
            explanation,
            optimizations,
            confidence: SUCCESS_CONFIDENCE,
            error: None,
        }
    }

    /// A result after both the first attempt and the retry failed validation.
    pub fn failed(query: String, error: Option<String>) -> Self {
        Self {
            query,
            explanation: FAILED_EXPLANATION.to_string(),
            optimizations: Vec::new(),
            confidence: 0.0,
            error,
        }
    }

    /// Returns true when the result carries a validation error.
    pub fn is_failure(&self) -> bool {
        self.confidence == 0.0
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Completion,
    ConversationStore,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_display_and_parse_are_lowercase() {
        for role in [Role::User, Role::Assistant, Role::System] {
            let s = role.to_string();
            assert_eq!(s, s.to_lowercase());
            assert_eq!(Role::from_str(&s).unwrap(), role);
        }
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn sql_result_omits_absent_error() {
        let result = SqlResult::success("SELECT 1 FROM t".into(), "x".into(), vec![]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["confidence"], 0.95);
    }

    #[test]
    fn failed_result_has_fixed_shape() {
        let result = SqlResult::failed("DELETE FROM t".into(), Some("Missing FROM clause".into()));
        assert_eq!(result.explanation, "Failed to generate valid SQL");
        assert!(result.optimizations.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert!(result.is_failure());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "Missing FROM clause");
    }

    #[test]
    fn generation_request_reads_message_field() {
        let json = r#"{
            "message": "show all customers",
            "history": [{"role": "user", "content": "hi"}],
            "schema": "CREATE TABLE customers (id INT);"
        }"#;
        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_message, "show all customers");
        assert_eq!(req.history, vec![ChatMessage::user("hi")]);
    }

    #[test]
    fn chat_message_from_stored_message_drops_timestamp() {
        let stored = Message {
            role: Role::Assistant,
            content: "SELECT 1".into(),
            timestamp: 1_700_000_000_000,
        };
        assert_eq!(ChatMessage::from(&stored), ChatMessage::assistant("SELECT 1"));
    }
}
