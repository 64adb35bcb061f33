// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation windows and schema cache for sqlpilot.
//!
//! Two interchangeable backends implement both
//! [`ConversationStore`](sqlpilot_core::ConversationStore) and
//! [`SchemaStore`](sqlpilot_core::SchemaStore): [`MemoryStorage`] and the
//! SQLite-backed [`SqliteStorage`].

pub mod adapter;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod schema;

use std::sync::Arc;

use sqlpilot_config::{ConversationBackend, ConversationConfig};
use sqlpilot_core::{ConversationStore, SchemaStore, SqlPilotError};

pub use adapter::SqliteStorage;
pub use database::Database;
pub use memory::MemoryStorage;
pub use schema::{DEFAULT_SCHEMA, DEFAULT_SCHEMA_NAME, resolve_default_schema, schema_key};

/// Window capacity when none is configured.
pub const DEFAULT_MAX_MESSAGES: usize = 20;

/// A conversation store and schema store backed by the same storage.
#[derive(Clone)]
pub struct Stores {
    pub conversations: Arc<dyn ConversationStore>,
    pub schemas: Arc<dyn SchemaStore>,
}

impl Stores {
    /// Both roles served by a single backend instance.
    pub fn shared<S>(storage: Arc<S>) -> Self
    where
        S: ConversationStore + SchemaStore,
    {
        Self {
            conversations: storage.clone(),
            schemas: storage,
        }
    }

    /// Flush the conversation backend before shutdown.
    pub async fn close(&self) -> Result<(), SqlPilotError> {
        self.conversations.close().await
    }
}

/// Build the configured backend, initializing it when it needs to.
pub async fn open_stores(config: &ConversationConfig) -> Result<Stores, SqlPilotError> {
    match config.backend {
        ConversationBackend::Memory => Ok(Stores::shared(Arc::new(MemoryStorage::new(
            config.max_messages,
        )))),
        ConversationBackend::Sqlite => {
            let storage = SqliteStorage::open(&config.database_path, config.max_messages).await?;
            Ok(Stores::shared(Arc::new(storage)))
        }
    }
}
