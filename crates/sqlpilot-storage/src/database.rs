// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite connection lifecycle: open, PRAGMAs, migrations.
//!
//! All statements run on tokio-rusqlite's single background thread, which
//! also serializes writes. Do not open a second connection for writes.

use std::path::Path;

use sqlpilot_core::SqlPilotError;
use tracing::debug;

use crate::migrations;

/// An open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and apply migrations.
    pub async fn open(path: &str) -> Result<Self, SqlPilotError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SqlPilotError::Storage {
                    source: Box::new(e),
                })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SqlPilotError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare().await?;
        debug!(path, "database opened");
        Ok(db)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    async fn prepare(&self) -> Result<(), SqlPilotError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                let _mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.busy_timeout(std::time::Duration::from_secs(5))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| SqlPilotError::Storage {
                source: e.to_string().into(),
            })
    }

    /// Checkpoint the WAL so the main file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), SqlPilotError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Convert a tokio-rusqlite error into `SqlPilotError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SqlPilotError {
    SqlPilotError::Storage {
        source: Box::new(e),
    }
}
