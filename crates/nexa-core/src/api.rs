// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types of the multiplexed `/api` endpoint.
//!
//! Requests name an `action` and carry an optional JSON `payload`; the
//! shapes below are shared by the gateway and the HTTP client.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{AdminCredentials, Message, Suggestion, Ticket, User};

/// Network label reported by `auth_config`.
pub const NETWORK_NAME: &str = "NEXA-MAINNET";

/// Body returned for actions outside [`Action`].
pub const RESTRICTED: &str = "RESTRICTED ACCESS";

/// Body returned for unexpected server failures.
pub const INTERNAL_ERROR: &str = "INTERNAL CORE ERROR";

/// Every action the endpoint dispatches on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Ping,
    AuthConfig,
    Auth,
    GetMessages,
    SendMessage,
    GetTickets,
    SendTicket,
    CloseTicket,
    DeleteTicket,
    GetSuggestions,
    SendSuggestion,
    DeleteSuggestion,
}

/// A POST body. `action` stays a string so unknown names can be answered with 403.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ApiRequest {
    pub fn new(action: Action, payload: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            action: Some(action.to_string()),
            payload: serde_json::to_value(payload)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketPayload {
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionPayload {
    pub suggestion: Suggestion,
}

/// Target of an admin-only action plus the credentials that authorize it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminTarget {
    pub id: String,
    #[serde(flatten)]
    pub credentials: AdminCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub const OK: Success = Success { success: true };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Non-sensitive deployment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfigInfo {
    pub version: String,
    pub network: String,
}

/// A DiceBear avatar URL for `seed` in the given style (`avataaars`, `bottts`, ...).
pub fn dicebear_avatar(style: &str, seed: &str) -> String {
    let base = format!("https://api.dicebear.com/7.x/{style}/svg");
    url::Url::parse_with_params(&base, &[("seed", seed)])
        .map(String::from)
        .unwrap_or(base)
}
