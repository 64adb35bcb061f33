// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait: a capped, append-only message log per session.

use async_trait::async_trait;

use crate::error::SqlPilotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Message, Role};

/// Per-session sliding window of messages.
///
/// Implementations must keep at most their configured capacity per session,
/// evicting the oldest entries first, and must make a write visible to a
/// read issued right after it for the same session.
#[async_trait]
pub trait ConversationStore: PluginAdapter {
    /// Appends a message stamped with the current epoch-ms time and returns it.
    ///
    /// Not idempotent: repeating a call appends a duplicate.
    async fn append(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Message, SqlPilotError>;

    /// Returns the current window, oldest first. Unknown sessions are empty.
    async fn history(&self, session_id: &str) -> Result<Vec<Message>, SqlPilotError>;

    /// Empties the window for a session.
    async fn clear(&self, session_id: &str) -> Result<(), SqlPilotError>;

    /// Flushes anything buffered before shutdown. The store stays usable.
    async fn close(&self) -> Result<(), SqlPilotError>;
}
