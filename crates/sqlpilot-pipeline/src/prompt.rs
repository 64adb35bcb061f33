// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the four pipeline stages.
//!
//! Pure formatting: each stage produces a system message followed by a
//! single user message.

use sqlpilot_core::ChatMessage;

/// Number of history entries embedded in the generate prompt by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 3;

const RETRY_SYSTEM: &str = "Fix this SQL query. Previous attempt had errors.";
const EXPLAIN_SYSTEM: &str = "Explain this SQL query in simple terms for someone learning SQL.";
const OPTIMIZE_SYSTEM: &str =
    "You are a database performance expert. Suggest optimizations for SQL queries.";

/// One of the four prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage<'a> {
    /// First attempt at turning the request into SQL.
    Generate,
    /// The single corrective attempt after validation failed.
    Retry {
        failed_query: &'a str,
        error: &'a str,
    },
    /// Beginner-level explanation of the accepted query.
    Explain { query: &'a str },
    /// Two or three performance suggestions for the accepted query.
    Optimize { query: &'a str },
}

impl Stage<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Generate => "generate",
            Stage::Retry { .. } => "retry",
            Stage::Explain { .. } => "explain",
            Stage::Optimize { .. } => "optimize",
        }
    }
}

/// Builds stage prompts with a fixed history window.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    history_window: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl PromptBuilder {
    pub fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    /// Build the ordered message list for `stage`.
    ///
    /// Only the generate stage reads `history`; only generate and optimize
    /// embed `schema`.
    pub fn build(
        &self,
        stage: Stage<'_>,
        schema: &str,
        user_message: &str,
        history: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        match stage {
            Stage::Generate => vec![
                ChatMessage::system(generate_system(schema, &self.history_tail(history))),
                ChatMessage::user(user_message),
            ],
            Stage::Retry {
                failed_query,
                error,
            } => vec![
                ChatMessage::system(RETRY_SYSTEM),
                ChatMessage::user(format!(
                    "Original request: {user_message}\n\n\
                     Failed query: {failed_query}\n\n\
                     Error: {error}\n\n\
                     Generate a corrected SQL query."
                )),
            ],
            Stage::Explain { query } => vec![
                ChatMessage::system(EXPLAIN_SYSTEM),
                ChatMessage::user(format!(
                    "User asked: \"{user_message}\"\n\n\
                     Generated query:\n{query}\n\n\
                     Explain what this query does and why it answers the user's question."
                )),
            ],
            Stage::Optimize { query } => vec![
                ChatMessage::system(OPTIMIZE_SYSTEM),
                ChatMessage::user(format!(
                    "Schema:\n{schema}\n\n\
                     Query:\n{query}\n\n\
                     Suggest 2-3 specific optimizations (indexes, query rewrites, etc.). Be concise."
                )),
            ],
        }
    }

    /// The most recent `history_window` entries as `role: content` lines.
    fn history_tail(&self, history: &[ChatMessage]) -> String {
        let start = history.len().saturating_sub(self.history_window);
        history[start..]
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn generate_system(schema: &str, history: &str) -> String {
    format!(
        "You are an expert SQL query generator. Given a database schema and user request, \
         generate a valid SQL query.\n\n\
         Database Schema:\n{schema}\n\n\
         Rules:\n\
         - Generate ONLY valid SQL syntax\n\
         - Use proper JOIN conditions\n\
         - Include appropriate WHERE clauses\n\
         - Consider performance (use indexes, avoid SELECT *)\n\
         - Return ONLY the SQL query, no explanations in this step\n\n\
         Previous conversation context:\n{history}"
    )
}
