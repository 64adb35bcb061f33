// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local conversation and schema store.

use std::collections::VecDeque;

use async_trait::async_trait;
use dashmap::DashMap;
use sqlpilot_core::{
    AdapterType, ConversationStore, HealthStatus, Message, PluginAdapter, Role, SchemaStore,
    SqlPilotError,
};

use crate::schema::schema_key;
use crate::DEFAULT_MAX_MESSAGES;

/// Sliding-window conversations and a schema cache held in memory.
///
/// Each session's window is mutated under its own shard lock, so an
/// `append` followed by `history` on the same session always observes the
/// append. Contents are lost when the process exits.
pub struct MemoryStorage {
    capacity: usize,
    sessions: DashMap<String, VecDeque<Message>>,
    cache: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sessions: DashMap::new(),
            cache: DashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of sessions with a (possibly empty) window.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ConversationStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SqlPilotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConversationStore for MemoryStorage {
    async fn append(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Message, SqlPilotError> {
        let message = Message {
            role,
            content: content.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        let mut window = self.sessions.entry(session_id.to_string()).or_default();
        window.push_back(message.clone());
        while window.len() > self.capacity {
            window.pop_front();
        }
        Ok(message)
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>, SqlPilotError> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|window| window.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SqlPilotError> {
        if let Some(mut window) = self.sessions.get_mut(session_id) {
            window.clear();
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), SqlPilotError> {
        Ok(())
    }
}

#[async_trait]
impl SchemaStore for MemoryStorage {
    async fn get_schema(&self, name: &str) -> Result<Option<String>, SqlPilotError> {
        Ok(self.cache.get(&schema_key(name)).map(|v| v.clone()))
    }

    async fn put_schema(&self, name: &str, schema: &str) -> Result<(), SqlPilotError> {
        self.cache.insert(schema_key(name), schema.to_string());
        Ok(())
    }
}
