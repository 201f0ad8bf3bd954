// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store, the gateway and the client.
//!
//! Field names serialize in camelCase so the JSON wire format and the
//! persisted snapshot blob stay compatible with browser clients.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Bot,
}

/// Lifecycle state of a support ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_url: Option<String>,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub role: Role,
}

impl Message {
    /// A message carries content if it has non-blank text, a sticker or an image.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || self.sticker_url.is_some() || self.image_url.is_some()
    }
}

/// A helpdesk ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub subject: String,
    pub status: TicketStatus,
    pub timestamp: i64,
}

/// An entry in the suggestion box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_avatar: String,
    pub content: String,
    pub timestamp: i64,
}

/// A resolved identity. The role is a display hint on the client side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub role: Role,
    pub email: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// `local@domain.tld` with no whitespace.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Whether `email` is shaped like a login email. Both the server and a
/// local-only client use this check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Admin credentials re-sent with every admin-only request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Body of the `ping` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingStatus {
    pub status: String,
    pub timestamp: i64,
    pub version: String,
}

/// The full persisted local copy of the client's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Users known to this device, keyed by lowercase email.
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub favorite_stickers: Vec<String>,
    /// When the retention sweep last cleared the message list.
    #[serde(default = "epoch")]
    pub last_reset: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Snapshot {
    /// A fresh snapshot whose retention clock starts at `now`.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            users: BTreeMap::new(),
            messages: Vec::new(),
            tickets: Vec::new(),
            suggestions: Vec::new(),
            favorite_stickers: Vec::new(),
            last_reset: now,
        }
    }

    /// Shallow merge: every field present in `patch` replaces the stored one.
    pub fn merge(&mut self, patch: SnapshotPatch) {
        if let Some(users) = patch.users {
            self.users = users;
        }
        if let Some(messages) = patch.messages {
            self.messages = messages;
        }
        if let Some(tickets) = patch.tickets {
            self.tickets = tickets;
        }
        if let Some(suggestions) = patch.suggestions {
            self.suggestions = suggestions;
        }
        if let Some(favorites) = patch.favorite_stickers {
            self.favorite_stickers = favorites;
        }
        if let Some(last_reset) = patch.last_reset {
            self.last_reset = last_reset;
        }
    }
}

/// A partial snapshot; `None` fields are left untouched by [`Snapshot::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPatch {
    pub users: Option<BTreeMap<String, User>>,
    pub messages: Option<Vec<Message>>,
    pub tickets: Option<Vec<Ticket>>,
    pub suggestions: Option<Vec<Suggestion>>,
    pub favorite_stickers: Option<Vec<String>>,
    pub last_reset: Option<DateTime<Utc>>,
}

impl SnapshotPatch {
    pub fn messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Some(messages),
            ..Self::default()
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    KeyValue,
    Remote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("alice@nexa.id"));
        assert!(is_valid_email(" alice@nexa.id "));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("alice@nexa"));
        assert!(!is_valid_email("a b@nexa.id"));
    }

    fn sample_message() -> Message {
        Message {
            id: "m1".into(),
            user_id: "u1".into(),
            user_name: "ALICE".into(),
            user_avatar: "https://example.com/a.svg".into(),
            text: "hello".into(),
            image_url: None,
            sticker_url: None,
            timestamp: 100,
            role: Role::User,
        }
    }

    #[test]
    fn message_uses_camel_case_wire_names() {
        let json = serde_json::to_value(sample_message()).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["userAvatar"], "https://example.com/a.svg");
        assert_eq!(json["role"], "user");
        assert!(json.get("imageUrl").is_none(), "absent optionals are skipped");
    }

    #[test]
    fn message_without_optionals_deserializes() {
        let json = r#"{"id":"x","userId":"u","userName":"n","userAvatar":"a",
                       "text":"t","timestamp":5,"role":"bot"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, Role::Bot);
        assert!(msg.sticker_url.is_none());
    }

    #[test]
    fn has_content_requires_text_sticker_or_image() {
        let mut msg = sample_message();
        msg.text = "   ".into();
        assert!(!msg.has_content());
        msg.sticker_url = Some("https://example.com/s.gif".into());
        assert!(msg.has_content());
    }

    #[test]
    fn role_and_status_round_trip_through_strum() {
        use std::str::FromStr;
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::Bot.to_string(), "bot");
        assert_eq!(TicketStatus::from_str("closed").unwrap(), TicketStatus::Closed);
    }

    #[test]
    fn snapshot_missing_fields_use_defaults() {
        let snap: Snapshot = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert!(snap.tickets.is_empty());
        assert!(snap.favorite_stickers.is_empty());
        assert_eq!(snap.last_reset, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn snapshot_merge_is_shallow() {
        let mut snap = Snapshot::empty(Utc::now());
        snap.favorite_stickers = vec!["fav".into()];
        snap.merge(SnapshotPatch::messages(vec![sample_message()]));
        assert_eq!(snap.messages.len(), 1);
        assert_eq!(snap.favorite_stickers, vec!["fav".to_string()]);
    }

    #[test]
    fn admin_credentials_debug_redacts_password() {
        let creds = AdminCredentials {
            email: "root@nexa.id".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }
}
