// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the server-side relational store.

use async_trait::async_trait;

use crate::error::NexaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Message, Suggestion, Ticket, User};

/// Persistence for users, messages, tickets and suggestions.
///
/// Mutations addressed by id return `false` when no row matched so callers
/// can answer "not found" without a second query.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, pragmas).
    async fn initialize(&self) -> Result<(), NexaError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), NexaError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, NexaError>;

    /// Inserts the user, or returns the already stored user for that email.
    async fn upsert_user(&self, user: &User) -> Result<User, NexaError>;

    /// Inserts a message. Returns `false` if the id already existed.
    async fn insert_message(&self, message: &Message) -> Result<bool, NexaError>;

    /// The newest `limit` messages in ascending timestamp order.
    async fn recent_messages(&self, limit: usize) -> Result<Vec<Message>, NexaError>;

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<bool, NexaError>;

    /// All tickets, newest first.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, NexaError>;

    async fn close_ticket(&self, id: &str) -> Result<bool, NexaError>;

    async fn delete_ticket(&self, id: &str) -> Result<bool, NexaError>;

    async fn insert_suggestion(&self, suggestion: &Suggestion) -> Result<bool, NexaError>;

    /// All suggestions, newest first.
    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, NexaError>;

    async fn delete_suggestion(&self, id: &str) -> Result<bool, NexaError>;
}
