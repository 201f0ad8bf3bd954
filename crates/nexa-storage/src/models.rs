// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite rows and the core domain types.
//!
//! Column order for each mapper matches the `*_COLUMNS` constant next to it.

use std::str::FromStr;

use rusqlite::Row;
use rusqlite::types::Type;

pub use nexa_core::types::{Message, Role, Suggestion, Ticket, TicketStatus, User};

pub(crate) const USER_COLUMNS: &str = "id, name, avatar, role, email";

pub(crate) const MESSAGE_COLUMNS: &str =
    "id, user_id, user_name, user_avatar, text, image_url, sticker_url, timestamp, role";

pub(crate) const TICKET_COLUMNS: &str = "id, user_id, user_name, subject, status, timestamp";

pub(crate) const SUGGESTION_COLUMNS: &str =
    "id, user_id, user_name, user_avatar, content, timestamp";

/// Parse a text column into a strum-backed enum.
fn enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        avatar: row.get(2)?,
        role: enum_column(row, 3)?,
        email: row.get(4)?,
    })
}

pub(crate) fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_avatar: row.get(3)?,
        text: row.get(4)?,
        image_url: row.get(5)?,
        sticker_url: row.get(6)?,
        timestamp: row.get(7)?,
        role: enum_column(row, 8)?,
    })
}

pub(crate) fn ticket_from_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        subject: row.get(3)?,
        status: enum_column(row, 4)?,
        timestamp: row.get(5)?,
    })
}

pub(crate) fn suggestion_from_row(row: &Row<'_>) -> rusqlite::Result<Suggestion> {
    Ok(Suggestion {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_avatar: row.get(3)?,
        content: row.get(4)?,
        timestamp: row.get(5)?,
    })
}
