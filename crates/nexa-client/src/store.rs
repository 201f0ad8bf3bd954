// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted local snapshot shared by every client context.
//!
//! The whole snapshot lives as one JSON blob under [`DB_KEY`] in a
//! [`KeyValueStore`]. Writes are read-modify-write with no compare-and-swap,
//! so concurrent writers clobber each other and the last one wins.
//!
//! [`LocalStore::read`] never mutates. The daily message reset runs only
//! when [`LocalStore::apply_retention_policy`] is called.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use nexa_core::{
    Clock, KeyValueStore, Message, NexaError, RetentionPolicy, Role, Snapshot, SnapshotPatch,
    User,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Key of the snapshot blob.
pub const DB_KEY: &str = "nexa_global_db";

/// Key of the last logged-in user.
pub const SESSION_KEY: &str = "nexa_session";

/// Snapshot access over a key-value backend.
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    policy: RetentionPolicy,
    retention_enabled: bool,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, policy: RetentionPolicy) -> Self {
        Self {
            kv,
            clock,
            policy,
            retention_enabled: true,
        }
    }

    /// Turn the daily sweep on or off (`[retention] enabled`).
    pub fn with_retention(mut self, enabled: bool) -> Self {
        self.retention_enabled = enabled;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Load the snapshot.
    ///
    /// A missing blob yields an empty snapshot stamped with the current
    /// time. A blob that does not parse also yields defaults; it stays on
    /// disk until the next write replaces it.
    pub async fn read(&self) -> Result<Snapshot, NexaError> {
        let Some(raw) = self.kv.get(DB_KEY).await? else {
            return Ok(Snapshot::empty(self.clock.now_utc()));
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(key = DB_KEY, error = %e, "local snapshot is corrupt, using defaults");
                Ok(Snapshot::empty(self.clock.now_utc()))
            }
        }
    }

    /// Shallow-merge `patch` into the persisted snapshot and return the result.
    pub async fn write(&self, patch: SnapshotPatch) -> Result<Snapshot, NexaError> {
        let mut snapshot = self.read().await?;
        snapshot.merge(patch);
        let raw = serde_json::to_string(&snapshot)?;
        self.kv.set(DB_KEY, &raw).await?;
        Ok(snapshot)
    }

    /// Clear messages when today's reset point has passed since the last sweep.
    ///
    /// Returns `true` when a sweep ran. Running it twice in a row clears at
    /// most once.
    pub async fn apply_retention_policy(&self) -> Result<bool, NexaError> {
        if !self.retention_enabled {
            return Ok(false);
        }
        let snapshot = self.read().await?;
        let now = self.clock.now();
        if !self.policy.is_due(snapshot.last_reset, now) {
            return Ok(false);
        }

        let cleared = snapshot.messages.len();
        self.write(SnapshotPatch {
            messages: Some(Vec::new()),
            last_reset: Some(now.with_timezone(&Utc)),
            ..SnapshotPatch::default()
        })
        .await?;
        info!(
            cleared,
            reset_time = %self.policy.reset_time(),
            "retention sweep cleared local messages"
        );
        Ok(true)
    }

    /// Add `url` to the favourites, or remove it when already present.
    pub async fn toggle_favorite_sticker(&self, url: &str) -> Result<Vec<String>, NexaError> {
        let mut favorites = self.read().await?.favorite_stickers;
        if let Some(pos) = favorites.iter().position(|s| s == url) {
            favorites.remove(pos);
        } else {
            favorites.push(url.to_string());
        }
        self.write(SnapshotPatch {
            favorite_stickers: Some(favorites.clone()),
            ..SnapshotPatch::default()
        })
        .await?;
        Ok(favorites)
    }

    /// Append a message to the snapshot. Returns `false` for a known id.
    pub async fn append_message(&self, message: &Message) -> Result<bool, NexaError> {
        let mut messages = self.read().await?.messages;
        if messages.iter().any(|m| m.id == message.id) {
            debug!(id = %message.id, "message already stored locally");
            return Ok(false);
        }
        messages.push(message.clone());
        self.write(SnapshotPatch::messages(messages)).await?;
        Ok(true)
    }

    /// Register or recall a user in the local directory, keyed by lowercased email.
    ///
    /// Local identities are always regular users; admin rights only come
    /// from the server.
    pub async fn local_user(
        &self,
        email: &str,
        avatar: impl FnOnce(&str) -> String,
    ) -> Result<User, NexaError> {
        let email = email.trim().to_lowercase();
        let mut users = self.read().await?.users;
        if let Some(user) = users.get(&email) {
            return Ok(user.clone());
        }

        let name = email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_uppercase();
        let user = User {
            id: format!("local-{}", uuid::Uuid::new_v4().simple()),
            avatar: avatar(&name),
            name,
            role: Role::User,
            email: email.clone(),
        };
        users.insert(email, user.clone());
        self.write(SnapshotPatch {
            users: Some(users),
            ..SnapshotPatch::default()
        })
        .await?;
        Ok(user)
    }

    pub async fn save_session(&self, user: &User) -> Result<(), NexaError> {
        let raw = serde_json::to_string(user)?;
        self.kv.set(SESSION_KEY, &raw).await
    }

    /// The saved session user. A corrupt blob is removed.
    pub async fn load_session(&self) -> Result<Option<User>, NexaError> {
        let Some(raw) = self.kv.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(key = SESSION_KEY, error = %e, "discarding corrupt session");
                self.kv.remove(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn clear_session(&self) -> Result<(), NexaError> {
        self.kv.remove(SESSION_KEY).await
    }
}

/// In-memory [`KeyValueStore`] for tests and throwaway contexts.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, NexaError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), NexaError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), NexaError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
