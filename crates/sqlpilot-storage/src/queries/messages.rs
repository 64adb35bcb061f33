// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation window queries.

use std::str::FromStr;

use rusqlite::params;
use rusqlite::types::Type;
use sqlpilot_core::{Message, Role, SqlPilotError};

use crate::database::{Database, map_tr_err};

/// Insert a message and evict everything older than the newest `capacity`
/// rows for the session, in one transaction.
pub async fn append_message(
    db: &Database,
    session_id: &str,
    message: &Message,
    capacity: usize,
) -> Result<(), SqlPilotError> {
    let session_id = session_id.to_string();
    let message = message.clone();
    let capacity = i64::try_from(capacity).unwrap_or(i64::MAX);

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO messages (session_id, role, content, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    session_id,
                    message.role.to_string(),
                    message.content,
                    message.timestamp,
                ],
            )?;
            tx.execute(
                "DELETE FROM messages
                 WHERE session_id = ?1
                   AND seq NOT IN (
                       SELECT seq FROM messages WHERE session_id = ?1
                       ORDER BY seq DESC LIMIT ?2
                   )",
                params![session_id, capacity],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// The session's window, oldest first.
pub async fn get_messages(db: &Database, session_id: &str) -> Result<Vec<Message>, SqlPilotError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT role, content, timestamp FROM messages
                 WHERE session_id = ?1 ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                let role: String = row.get(0)?;
                let role = Role::from_str(&role).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                })?;
                Ok(Message {
                    role,
                    content: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Remove every message of the session. Returns the number deleted.
pub async fn delete_messages(db: &Database, session_id: &str) -> Result<usize, SqlPilotError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM messages WHERE session_id = ?1", params![session_id])
        })
        .await
        .map_err(map_tr_err)
}
