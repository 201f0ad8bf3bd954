// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat drafting, send throttling and the `.Brat` bot command.

use std::time::Duration;

use nexa_bus::{BusEvent, BusHandle};
use nexa_config::model::ChatConfig;
use nexa_core::api::dicebear_avatar;
use nexa_core::{Message, NexaError, Role, User};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Prefix of the image-generation command.
pub const BRAT_PREFIX: &str = ".Brat ";

pub const BOT_USER_ID: &str = "nexa-bot";
pub const BOT_USER_NAME: &str = "NEXA BOT";

/// Offset of the bot reply's timestamp and the delay before it is broadcast.
pub const BOT_REPLY_DELAY: Duration = Duration::from_millis(500);

const BRAT_ENDPOINT: &str = "https://api.nexray.web.id/maker/brathd";

/// What the user typed or picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    pub sticker_url: Option<String>,
}

impl Draft {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sticker_url: None,
        }
    }

    pub fn sticker(url: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            sticker_url: Some(url.into()),
        }
    }
}

/// Per-client cooldown and spam lock.
///
/// After `spam_limit` accepted sends the next attempt locks sending for
/// `ban`; once the lock expires the counter starts again from zero.
#[derive(Debug)]
pub struct SpamGuard {
    cooldown: Duration,
    spam_limit: u32,
    ban: Duration,
    sent: u32,
    last_sent: Option<Instant>,
    banned_until: Option<Instant>,
}

impl SpamGuard {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            cooldown: Duration::from_secs(config.cooldown_secs),
            spam_limit: config.spam_limit,
            ban: Duration::from_secs(config.ban_secs),
            sent: 0,
            last_sent: None,
            banned_until: None,
        }
    }

    /// Whether a send is allowed right now. Reaching the limit starts the ban.
    pub fn check(&mut self) -> Result<(), NexaError> {
        let now = Instant::now();

        if let Some(until) = self.banned_until {
            if now < until {
                let remaining = until.duration_since(now).as_secs().max(1);
                return Err(NexaError::Validation(format!(
                    "sending locked by spam protection for {remaining}s"
                )));
            }
            debug!("spam lock expired");
            self.banned_until = None;
            self.sent = 0;
        }

        if self
            .last_sent
            .is_some_and(|last| now.duration_since(last) < self.cooldown)
        {
            return Err(NexaError::Validation("cooldown active".to_string()));
        }

        if self.sent >= self.spam_limit {
            self.banned_until = Some(now + self.ban);
            warn!(
                sent = self.sent,
                ban_secs = self.ban.as_secs(),
                "spam limit reached, sending locked"
            );
            return Err(NexaError::Validation(format!(
                "spam limit reached, sending locked for {}s",
                self.ban.as_secs()
            )));
        }

        Ok(())
    }

    /// Count an accepted send.
    pub fn record(&mut self) {
        self.sent += 1;
        self.last_sent = Some(Instant::now());
    }

    pub fn is_banned(&self) -> bool {
        self.banned_until.is_some_and(|until| Instant::now() < until)
    }
}

/// Turn a draft into a message from `user`. Empty drafts are rejected.
pub fn compose(user: &User, draft: &Draft, now_millis: i64) -> Result<Message, NexaError> {
    let text = draft.text.trim();
    if text.is_empty() && draft.sticker_url.is_none() {
        return Err(NexaError::Validation("message is empty".to_string()));
    }
    Ok(Message {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        user_avatar: user.avatar.clone(),
        text: text.to_string(),
        image_url: None,
        sticker_url: draft.sticker_url.clone(),
        timestamp: now_millis,
        role: user.role,
    })
}

/// The bot's answer to a `.Brat <query>` message, if it is one.
pub fn bot_reply(message: &Message) -> Option<Message> {
    let query = message.text.strip_prefix(BRAT_PREFIX)?.trim();
    if query.is_empty() {
        return None;
    }

    let image_url = Url::parse_with_params(BRAT_ENDPOINT, &[("text", query)])
        .map(String::from)
        .ok()?;
    Some(Message {
        id: format!("bot-{}", uuid::Uuid::new_v4().simple()),
        user_id: BOT_USER_ID.to_string(),
        user_name: BOT_USER_NAME.to_string(),
        user_avatar: dicebear_avatar("bottts", "Nexa"),
        text: format!("Generated result for: \"{query}\""),
        image_url: Some(image_url),
        sticker_url: None,
        timestamp: message.timestamp + BOT_REPLY_DELAY.as_millis() as i64,
        role: Role::Bot,
    })
}

/// Publish `message` on the bus after `delay`.
pub fn publish_later(bus: BusHandle, message: Message, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        bus.publish(BusEvent::NewMessage(message));
    })
}
