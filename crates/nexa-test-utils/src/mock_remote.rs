// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory remote for deterministic client tests.
//!
//! `MockRemote` implements [`RemoteSource`] over plain vectors and mirrors
//! the gateway's rules: logins register users on first sight, the admin
//! account needs its password, admin actions re-check credentials and
//! unknown ids are `NotFound`. Pings can be made to fail or hang, and the
//! whole remote can be taken offline.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use nexa_core::{
    AdminCredentials, Message, NexaError, PingStatus, RemoteSource, Role, Suggestion, Ticket,
    TicketStatus, User, VERSION, is_valid_email,
};

#[derive(Default)]
struct State {
    messages: Vec<Message>,
    tickets: Vec<Ticket>,
    suggestions: Vec<Suggestion>,
    users: HashMap<String, User>,
    send_budget: Option<u32>,
}

/// A fake remote backed by in-memory collections.
#[derive(Default)]
pub struct MockRemote {
    state: Mutex<State>,
    admin: Option<AdminCredentials>,
    pings: AtomicU32,
    failing_pings: AtomicU32,
    hang: AtomicBool,
    offline: AtomicBool,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `email`/`password` as the admin account.
    pub fn with_admin(mut self, email: &str, password: &str) -> Self {
        self.admin = Some(AdminCredentials {
            email: email.to_lowercase(),
            password: password.to_string(),
        });
        self
    }

    /// Fail the next `count` pings.
    pub fn fail_pings(&self, count: u32) {
        self.failing_pings.store(count, Ordering::SeqCst);
    }

    /// Make pings never complete.
    pub fn hang_pings(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    /// Accept the next `count` message sends, then fail every later one.
    pub fn fail_sends_after(&self, count: u32) {
        self.lock().send_budget = Some(count);
    }

    /// While offline every call except `ping` fails with a remote error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of pings received so far.
    pub fn pings(&self) -> u32 {
        self.pings.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn tickets(&self) -> Vec<Ticket> {
        self.lock().tickets.clone()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.lock().suggestions.clone()
    }

    /// Seed a message as if another client had sent it.
    pub fn push_message(&self, message: Message) {
        self.lock().messages.push(message);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking test thread must not hide state from the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reachable(&self) -> Result<(), NexaError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(NexaError::Remote {
                message: "mock remote is offline".into(),
                source: None,
            })
        } else {
            Ok(())
        }
    }

    fn is_admin_email(&self, email: &str) -> bool {
        self.admin.as_ref().is_some_and(|a| a.email == email)
    }

    fn check_admin(&self, credentials: &AdminCredentials) -> Result<(), NexaError> {
        match &self.admin {
            Some(admin)
                if admin.email == credentials.email.to_lowercase()
                    && admin.password == credentials.password =>
            {
                Ok(())
            }
            _ => Err(NexaError::Forbidden("ACCESS DENIED".into())),
        }
    }
}

fn not_found(kind: &'static str, id: &str) -> NexaError {
    NexaError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    async fn ping(&self) -> Result<PingStatus, NexaError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let failing = self
            .failing_pings
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(NexaError::Remote {
                message: "mock ping failure".into(),
                source: None,
            });
        }
        Ok(PingStatus {
            status: "active".into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            version: VERSION.to_string(),
        })
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, NexaError> {
        self.reachable()?;
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(NexaError::Validation("INVALID EMAIL FORMAT".into()));
        }
        let role = if self.is_admin_email(&email) {
            self.check_admin(&AdminCredentials {
                email: email.clone(),
                password: password.to_string(),
            })?;
            Role::Admin
        } else {
            Role::User
        };
        let mut state = self.lock();
        let user = state.users.entry(email.clone()).or_insert_with(|| {
            let name = email.split('@').next().unwrap_or_default().to_uppercase();
            User {
                id: uuid::Uuid::new_v4().to_string(),
                avatar: format!("https://avatars.test/{name}.svg"),
                name,
                role,
                email: email.clone(),
            }
        });
        user.role = role;
        Ok(user.clone())
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>, NexaError> {
        self.reachable()?;
        let mut messages = self.messages();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    async fn send_message(&self, message: &Message) -> Result<(), NexaError> {
        self.reachable()?;
        let mut state = self.lock();
        let budget = state.send_budget;
        match budget {
            Some(0) => {
                return Err(NexaError::Remote {
                    message: "mock send rejected".into(),
                    source: None,
                });
            }
            Some(n) => state.send_budget = Some(n - 1),
            None => {}
        }
        if !state.messages.iter().any(|m| m.id == message.id) {
            state.messages.push(message.clone());
        }
        Ok(())
    }

    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, NexaError> {
        self.reachable()?;
        let mut tickets = self.tickets();
        tickets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(tickets)
    }

    async fn send_ticket(&self, ticket: &Ticket) -> Result<(), NexaError> {
        self.reachable()?;
        let mut state = self.lock();
        if !state.tickets.iter().any(|t| t.id == ticket.id) {
            state.tickets.push(ticket.clone());
        }
        Ok(())
    }

    async fn fetch_suggestions(&self) -> Result<Vec<Suggestion>, NexaError> {
        self.reachable()?;
        let mut suggestions = self.suggestions();
        suggestions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(suggestions)
    }

    async fn send_suggestion(&self, suggestion: &Suggestion) -> Result<(), NexaError> {
        self.reachable()?;
        let mut state = self.lock();
        if !state.suggestions.iter().any(|s| s.id == suggestion.id) {
            state.suggestions.push(suggestion.clone());
        }
        Ok(())
    }

    async fn close_ticket(&self, id: &str, admin: &AdminCredentials) -> Result<(), NexaError> {
        self.reachable()?;
        self.check_admin(admin)?;
        let mut state = self.lock();
        let ticket = state
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("ticket", id))?;
        ticket.status = TicketStatus::Closed;
        Ok(())
    }

    async fn delete_ticket(&self, id: &str, admin: &AdminCredentials) -> Result<(), NexaError> {
        self.reachable()?;
        self.check_admin(admin)?;
        let mut state = self.lock();
        let before = state.tickets.len();
        state.tickets.retain(|t| t.id != id);
        if state.tickets.len() == before {
            return Err(not_found("ticket", id));
        }
        Ok(())
    }

    async fn delete_suggestion(
        &self,
        id: &str,
        admin: &AdminCredentials,
    ) -> Result<(), NexaError> {
        self.reachable()?;
        self.check_admin(admin)?;
        let mut state = self.lock();
        let before = state.suggestions.len();
        state.suggestions.retain(|s| s.id != id);
        if state.suggestions.len() == before {
            return Err(not_found("suggestion", id));
        }
        Ok(())
    }
}
