// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The client's view of the authoritative backend.

use async_trait::async_trait;

use crate::error::NexaError;
use crate::types::{AdminCredentials, Message, PingStatus, Suggestion, Ticket, User};

/// Operations the client performs against the API.
///
/// Implemented over HTTP by the client crate and in memory by test fakes.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn ping(&self) -> Result<PingStatus, NexaError>;

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, NexaError>;

    async fn fetch_messages(&self) -> Result<Vec<Message>, NexaError>;

    async fn send_message(&self, message: &Message) -> Result<(), NexaError>;

    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, NexaError>;

    async fn send_ticket(&self, ticket: &Ticket) -> Result<(), NexaError>;

    async fn fetch_suggestions(&self) -> Result<Vec<Suggestion>, NexaError>;

    async fn send_suggestion(&self, suggestion: &Suggestion) -> Result<(), NexaError>;

    async fn close_ticket(&self, id: &str, admin: &AdminCredentials) -> Result<(), NexaError>;

    async fn delete_ticket(&self, id: &str, admin: &AdminCredentials) -> Result<(), NexaError>;

    async fn delete_suggestion(
        &self,
        id: &str,
        admin: &AdminCredentials,
    ) -> Result<(), NexaError>;
}
