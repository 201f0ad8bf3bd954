// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support tickets and the suggestion box.
//!
//! Role checks here only shape what the client offers; the server
//! re-checks admin credentials on every admin action.

use nexa_core::{NexaError, Suggestion, Ticket, TicketStatus, User};

/// A new open ticket from `user`.
pub fn new_ticket(user: &User, subject: &str, now_millis: i64) -> Result<Ticket, NexaError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(NexaError::Validation("ticket subject is empty".to_string()));
    }
    Ok(Ticket {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        subject: subject.to_string(),
        status: TicketStatus::Open,
        timestamp: now_millis,
    })
}

/// Tickets `user` may see: all of them for an admin, otherwise their own.
pub fn visible_tickets<'a>(user: &User, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
    tickets
        .iter()
        .filter(|t| user.is_admin() || t.user_id == user.id)
        .collect()
}

/// A new suggestion. Admins read suggestions; they do not submit them.
pub fn new_suggestion(
    user: &User,
    content: &str,
    now_millis: i64,
) -> Result<Suggestion, NexaError> {
    if user.is_admin() {
        return Err(NexaError::Forbidden(
            "admins cannot submit suggestions".to_string(),
        ));
    }
    let content = content.trim();
    if content.is_empty() {
        return Err(NexaError::Validation("suggestion is empty".to_string()));
    }
    Ok(Suggestion {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        user_avatar: user.avatar.clone(),
        content: content.to_string(),
        timestamp: now_millis,
    })
}

pub fn require_admin(user: &User) -> Result<(), NexaError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(NexaError::Forbidden("admin only".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexa_core::Role;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            name: id.to_uppercase(),
            avatar: String::new(),
            role,
            email: format!("{id}@nexa.id"),
        }
    }

    #[test]
    fn ticket_needs_a_subject() {
        let alice = user("alice", Role::User);
        assert!(new_ticket(&alice, "  ", 1).is_err());
        let ticket = new_ticket(&alice, " printer on fire ", 7).unwrap();
        assert_eq!(ticket.subject, "printer on fire");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.timestamp, 7);
    }

    #[test]
    fn users_see_only_their_tickets() {
        let alice = user("alice", Role::User);
        let bob = user("bob", Role::User);
        let admin = user("root", Role::Admin);
        let tickets = vec![
            new_ticket(&alice, "a", 1).unwrap(),
            new_ticket(&bob, "b", 2).unwrap(),
        ];

        let mine = visible_tickets(&alice, &tickets);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].subject, "a");
        assert_eq!(visible_tickets(&admin, &tickets).len(), 2);
    }

    #[test]
    fn suggestions_are_for_regular_users() {
        let admin = user("root", Role::Admin);
        assert!(matches!(
            new_suggestion(&admin, "more stickers", 1),
            Err(NexaError::Forbidden(_))
        ));

        let alice = user("alice", Role::User);
        assert!(matches!(
            new_suggestion(&alice, "", 1),
            Err(NexaError::Validation(_))
        ));
        let s = new_suggestion(&alice, "more stickers", 3).unwrap();
        assert_eq!(s.user_name, "ALICE");
    }

    #[test]
    fn admin_gate() {
        assert!(require_admin(&user("root", Role::Admin)).is_ok());
        assert!(require_admin(&user("alice", Role::User)).is_err());
    }
}
