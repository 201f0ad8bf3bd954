// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message operations.

use nexa_core::NexaError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{MESSAGE_COLUMNS, Message, message_from_row};

/// Insert a message. A duplicate id is ignored and reported as `false`.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<bool, NexaError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO messages
                 (id, user_id, user_name, user_avatar, text, image_url, sticker_url, timestamp, role)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    msg.id,
                    msg.user_id,
                    msg.user_name,
                    msg.user_avatar,
                    msg.text,
                    msg.image_url,
                    msg.sticker_url,
                    msg.timestamp,
                    msg.role.to_string(),
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// The newest `limit` messages, returned oldest first.
pub async fn recent_messages(db: &Database, limit: usize) -> Result<Vec<Message>, NexaError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| {
            let sql = format!(
                "SELECT {MESSAGE_COLUMNS} FROM (
                     SELECT rowid AS seq, {MESSAGE_COLUMNS} FROM messages
                     ORDER BY timestamp DESC, seq DESC LIMIT ?1
                 ) ORDER BY timestamp ASC, seq ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![limit], message_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
