// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of [`RemoteSource`] against the `/api` endpoint.
//!
//! Reads are `GET ?action=...&t=<millis>` (the `t` parameter defeats
//! intermediary caches); writes are `POST {action, payload}`.

use std::time::Duration;

use async_trait::async_trait;
use nexa_core::api::{
    Action, AdminTarget, ApiRequest, AuthRequest, AuthResponse, ErrorBody, MessagePayload,
    SuggestionPayload, TicketPayload,
};
use nexa_core::{
    AdminCredentials, Message, NexaError, PingStatus, RemoteSource, Suggestion, Ticket, User,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Remote source speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRemote {
    /// Build a client for `api_url` (including the `/api` path).
    pub fn new(api_url: &str) -> Result<Self, NexaError> {
        let base_url = Url::parse(api_url)
            .map_err(|e| NexaError::Config(format!("invalid api_url `{api_url}`: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NexaError::Remote {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn action_url(&self, action: Action) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("action", &action.to_string())
            .append_pair("t", &chrono::Utc::now().timestamp_millis().to_string());
        url
    }

    async fn get<T: DeserializeOwned>(&self, action: Action) -> Result<T, NexaError> {
        let response = self
            .client
            .get(self.action_url(action))
            .send()
            .await
            .map_err(transport_error)?;
        decode(action, response, None).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        action: Action,
        payload: impl Serialize,
        target: Option<(&'static str, &str)>,
    ) -> Result<T, NexaError> {
        let body = ApiRequest::new(action, payload)?;
        let response = self
            .client
            .post(self.base_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(action, response, target).await
    }

    async fn admin_action(
        &self,
        action: Action,
        kind: &'static str,
        id: &str,
        admin: &AdminCredentials,
    ) -> Result<(), NexaError> {
        let target = AdminTarget {
            id: id.to_string(),
            credentials: admin.clone(),
        };
        let _: serde_json::Value = self.post(action, target, Some((kind, id))).await?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> NexaError {
    NexaError::Remote {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn decode<T: DeserializeOwned>(
    action: Action,
    response: reqwest::Response,
    target: Option<(&'static str, &str)>,
) -> Result<T, NexaError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| NexaError::Remote {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    debug!(%action, status = %status, "remote response received");

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| NexaError::Remote {
            message: format!("unexpected `{action}` response: {e}"),
            source: Some(Box::new(e)),
        });
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("API returned {status}: {body}"));
    Err(match (status, target) {
        (StatusCode::BAD_REQUEST, _) => NexaError::Validation(message),
        (StatusCode::FORBIDDEN, _) => NexaError::Forbidden(message),
        (StatusCode::NOT_FOUND, Some((kind, id))) => NexaError::NotFound {
            kind,
            id: id.to_string(),
        },
        (StatusCode::SERVICE_UNAVAILABLE, _) => NexaError::Unavailable(message),
        _ => NexaError::Remote {
            message,
            source: None,
        },
    })
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn ping(&self) -> Result<PingStatus, NexaError> {
        self.get(Action::Ping).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, NexaError> {
        let auth = AuthRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.post(Action::Auth, auth, None).await?;
        Ok(response.user)
    }

    async fn fetch_messages(&self) -> Result<Vec<Message>, NexaError> {
        self.get(Action::GetMessages).await
    }

    async fn send_message(&self, message: &Message) -> Result<(), NexaError> {
        let payload = MessagePayload {
            message: message.clone(),
        };
        let _: serde_json::Value = self.post(Action::SendMessage, payload, None).await?;
        Ok(())
    }

    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, NexaError> {
        self.get(Action::GetTickets).await
    }

    async fn send_ticket(&self, ticket: &Ticket) -> Result<(), NexaError> {
        let payload = TicketPayload {
            ticket: ticket.clone(),
        };
        let _: serde_json::Value = self.post(Action::SendTicket, payload, None).await?;
        Ok(())
    }

    async fn fetch_suggestions(&self) -> Result<Vec<Suggestion>, NexaError> {
        self.get(Action::GetSuggestions).await
    }

    async fn send_suggestion(&self, suggestion: &Suggestion) -> Result<(), NexaError> {
        let payload = SuggestionPayload {
            suggestion: suggestion.clone(),
        };
        let _: serde_json::Value = self.post(Action::SendSuggestion, payload, None).await?;
        Ok(())
    }

    async fn close_ticket(&self, id: &str, admin: &AdminCredentials) -> Result<(), NexaError> {
        self.admin_action(Action::CloseTicket, "ticket", id, admin)
            .await
    }

    async fn delete_ticket(&self, id: &str, admin: &AdminCredentials) -> Result<(), NexaError> {
        self.admin_action(Action::DeleteTicket, "ticket", id, admin)
            .await
    }

    async fn delete_suggestion(
        &self,
        id: &str,
        admin: &AdminCredentials,
    ) -> Result<(), NexaError> {
        self.admin_action(Action::DeleteSuggestion, "suggestion", id, admin)
            .await
    }
}
