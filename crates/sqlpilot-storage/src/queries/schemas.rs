// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema cache queries.

use rusqlite::{OptionalExtension, params};
use sqlpilot_core::SqlPilotError;

use crate::database::{Database, map_tr_err};

pub async fn get_value(db: &Database, key: &str) -> Result<Option<String>, SqlPilotError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT value FROM schema_cache WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace the value under `key`.
pub async fn put_value(
    db: &Database,
    key: &str,
    value: &str,
    updated_at: i64,
) -> Result<(), SqlPilotError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO schema_cache (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
