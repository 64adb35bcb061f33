// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the conversation and schema stores.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use sqlpilot_core::{
    AdapterType, ConversationStore, HealthStatus, Message, PluginAdapter, Role, SchemaStore,
    SqlPilotError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;
use crate::schema::schema_key;

/// SQLite-backed store with the same window semantics as
/// [`MemoryStorage`](crate::MemoryStorage), surviving restarts.
///
/// The database is opened lazily by [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    database_path: String,
    capacity: usize,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(database_path: impl Into<String>, capacity: usize) -> Self {
        Self {
            database_path: database_path.into(),
            capacity: capacity.max(1),
            db: OnceCell::new(),
        }
    }

    /// Construct and initialize in one step.
    pub async fn open(
        database_path: impl Into<String>,
        capacity: usize,
    ) -> Result<Self, SqlPilotError> {
        let storage = Self::new(database_path, capacity);
        storage.initialize().await?;
        Ok(storage)
    }

    /// Open the database file and apply migrations.
    pub async fn initialize(&self) -> Result<(), SqlPilotError> {
        let db = Database::open(&self.database_path).await?;
        self.db.set(db).map_err(|_| SqlPilotError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.database_path, capacity = self.capacity, "SQLite storage initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, SqlPilotError> {
        self.db.get().ok_or_else(|| SqlPilotError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ConversationStore
    }

    async fn health_check(&self) -> Result<HealthStatus, SqlPilotError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConversationStore for SqliteStorage {
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
        queries::messages::append_message(self.db()?, session_id, &message, self.capacity).await?;
        Ok(message)
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>, SqlPilotError> {
        queries::messages::get_messages(self.db()?, session_id).await
    }

    async fn clear(&self, session_id: &str) -> Result<(), SqlPilotError> {
        let removed = queries::messages::delete_messages(self.db()?, session_id).await?;
        debug!(session_id, removed, "conversation cleared");
        Ok(())
    }

    /// Checkpoint the WAL. A no-op if the database was never opened.
    async fn close(&self) -> Result<(), SqlPilotError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!(path = %self.database_path, "WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaStore for SqliteStorage {
    async fn get_schema(&self, name: &str) -> Result<Option<String>, SqlPilotError> {
        queries::schemas::get_value(self.db()?, &schema_key(name)).await
    }

    async fn put_schema(&self, name: &str, schema: &str) -> Result<(), SqlPilotError> {
        let now = chrono::Utc::now().timestamp_millis();
        queries::schemas::put_value(self.db()?, &schema_key(name), schema, now).await
    }
}
