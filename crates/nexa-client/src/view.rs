// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory view state of one client context.
//!
//! Messages are kept ascending by timestamp; tickets and suggestions newest
//! first. Every insert path deduplicates by id.

use std::sync::Arc;

use nexa_bus::BusEvent;
use nexa_core::{Message, Suggestion, Ticket, TicketStatus};
use tokio::sync::RwLock;

/// View state shared by the sync loop, the bus listener and user operations.
pub type SharedView = Arc<RwLock<ViewState>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    messages: Vec<Message>,
    tickets: Vec<Ticket>,
    suggestions: Vec<Suggestion>,
    favorite_stickers: Vec<String>,
}

impl ViewState {
    pub fn shared() -> SharedView {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn favorite_stickers(&self) -> &[String] {
        &self.favorite_stickers
    }

    /// Reconcile: the fetched collection replaces the current one wholesale.
    pub fn replace_messages(&mut self, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.timestamp);
        self.messages = messages;
    }

    pub fn replace_tickets(&mut self, mut tickets: Vec<Ticket>) {
        tickets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.tickets = tickets;
    }

    pub fn replace_suggestions(&mut self, mut suggestions: Vec<Suggestion>) {
        suggestions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.suggestions = suggestions;
    }

    pub fn set_favorite_stickers(&mut self, favorites: Vec<String>) {
        self.favorite_stickers = favorites;
    }

    /// Apply an event received from another context. Returns `false` when
    /// the view already held the entity.
    pub fn apply_broadcast(&mut self, event: &BusEvent) -> bool {
        match event {
            BusEvent::NewMessage(message) => self.push_message(message.clone()),
        }
    }

    /// Insert a message in timestamp order unless its id is already present.
    pub fn push_message(&mut self, message: Message) -> bool {
        if self.messages.iter().any(|m| m.id == message.id) {
            return false;
        }
        let pos = self
            .messages
            .partition_point(|m| m.timestamp <= message.timestamp);
        self.messages.insert(pos, message);
        true
    }

    pub fn remove_message(&mut self, id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    pub fn push_ticket(&mut self, ticket: Ticket) -> bool {
        if self.tickets.iter().any(|t| t.id == ticket.id) {
            return false;
        }
        self.tickets.insert(0, ticket);
        true
    }

    pub fn push_suggestion(&mut self, suggestion: Suggestion) -> bool {
        if self.suggestions.iter().any(|s| s.id == suggestion.id) {
            return false;
        }
        self.suggestions.insert(0, suggestion);
        true
    }

    pub fn close_ticket(&mut self, id: &str) -> bool {
        match self.tickets.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                ticket.status = TicketStatus::Closed;
                true
            }
            None => false,
        }
    }

    pub fn remove_ticket(&mut self, id: &str) -> bool {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != id);
        self.tickets.len() != before
    }

    pub fn remove_suggestion(&mut self, id: &str) -> bool {
        let before = self.suggestions.len();
        self.suggestions.retain(|s| s.id != id);
        self.suggestions.len() != before
    }
}
