// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample entities for tests.

use nexa_core::{Message, Role, Suggestion, Ticket, TicketStatus, User};

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        avatar: String::new(),
        role: Role::User,
        email: format!("{}@nexa.id", name.to_lowercase()),
    }
}

pub fn message(id: &str, timestamp: i64) -> Message {
    Message {
        id: id.into(),
        user_id: "u1".into(),
        user_name: "ALICE".into(),
        user_avatar: String::new(),
        text: format!("message {id}"),
        image_url: None,
        sticker_url: None,
        timestamp,
        role: Role::User,
    }
}

pub fn ticket(id: &str, timestamp: i64) -> Ticket {
    Ticket {
        id: id.into(),
        user_id: "u1".into(),
        user_name: "ALICE".into(),
        subject: format!("ticket {id}"),
        status: TicketStatus::Open,
        timestamp,
    }
}

pub fn suggestion(id: &str, timestamp: i64) -> Suggestion {
    Suggestion {
        id: id.into(),
        user_id: "u1".into(),
        user_name: "ALICE".into(),
        user_avatar: String::new(),
        content: format!("suggestion {id}"),
        timestamp,
    }
}
