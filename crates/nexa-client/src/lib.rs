// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-first sync client for Nexa.
//!
//! A [`NexaClient`] is one context (the headless rendition of a browser
//! tab). It:
//! - Boots by probing the remote and falls back to local-only mode
//! - Keeps an in-memory [`ViewState`] reconciled by the [`SyncLoop`]
//! - Shares new messages with sibling contexts over the event bus
//! - Persists favourites, the session and (offline) all data in the [`LocalStore`]

pub mod boot;
pub mod chat;
pub mod helpdesk;
pub mod profile;
pub mod remote;
pub mod shutdown;
pub mod store;
pub mod sync;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use nexa_bus::{BusEvent, BusHandle};
use nexa_config::model::{NexaConfig, StorageConfig};
use nexa_core::api::dicebear_avatar;
use nexa_core::{
    AdminCredentials, KeyValueStore, Message, NexaError, RemoteSource, RetentionPolicy,
    SnapshotPatch, StorageAdapter, Suggestion, SystemClock, Ticket, TicketStatus, User,
    is_valid_email,
};
use nexa_storage::SqliteStorage;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use crate::boot::{BootOutcome, BootSettings};
pub use crate::chat::{Draft, SpamGuard};
pub use crate::profile::AvatarUpload;
pub use crate::remote::HttpRemote;
pub use crate::store::{LocalStore, MemoryKv};
pub use crate::sync::{CollectionSource, RemoteCollections, SyncLoop};
pub use crate::view::{SharedView, ViewState};

/// Open the SQLite-backed local store described by `config`.
pub async fn open_local_store(config: &NexaConfig) -> Result<LocalStore, NexaError> {
    let storage = SqliteStorage::new(StorageConfig {
        database_path: config.client.local_db_path.clone(),
        wal_mode: true,
    });
    storage.initialize().await?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(storage);
    let policy = RetentionPolicy::new(config.retention.reset_hour, config.retention.reset_minute)?;
    Ok(LocalStore::new(kv, Arc::new(SystemClock), policy).with_retention(config.retention.enabled))
}

/// One client context.
pub struct NexaClient {
    outcome: BootOutcome,
    store: LocalStore,
    remote: Arc<dyn RemoteSource>,
    bus: BusHandle,
    view: SharedView,
    session: RwLock<Option<User>>,
    admin: RwLock<Option<AdminCredentials>>,
    guard: Mutex<SpamGuard>,
    poll_interval: Duration,
}

impl NexaClient {
    /// Boot a context: probe the remote, restore the session when online,
    /// load favourites and run the first sync.
    pub async fn start(
        config: &NexaConfig,
        remote: Arc<dyn RemoteSource>,
        store: LocalStore,
        bus: BusHandle,
    ) -> Result<Self, NexaError> {
        let settings = BootSettings::from_config(&config.client);
        let outcome = boot::probe(remote.as_ref(), &settings).await;
        let session = if outcome.is_online() {
            boot::restore_session(&store).await
        } else {
            None
        };

        let view = ViewState::shared();
        let favorites = store.read().await?.favorite_stickers;
        view.write().await.set_favorite_stickers(favorites);

        let client = Self {
            outcome,
            store,
            remote,
            bus,
            view,
            session: RwLock::new(session),
            admin: RwLock::new(None),
            guard: Mutex::new(SpamGuard::new(&config.chat)),
            poll_interval: Duration::from_secs(config.client.poll_interval_secs),
        };

        if let Err(e) = client.sync_now().await {
            warn!(error = %e, "initial sync failed");
        }
        info!(
            online = client.is_online(),
            origin = %client.bus.origin(),
            "client context ready"
        );
        Ok(client)
    }

    pub fn outcome(&self) -> &BootOutcome {
        &self.outcome
    }

    pub fn is_online(&self) -> bool {
        self.outcome.is_online()
    }

    pub fn view(&self) -> SharedView {
        self.view.clone()
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub async fn user(&self) -> Option<User> {
        self.session.read().await.clone()
    }

    fn sync_loop(&self) -> SyncLoop {
        let source: Arc<dyn CollectionSource> = if self.is_online() {
            Arc::new(RemoteCollections::new(self.remote.clone()))
        } else {
            Arc::new(self.store.clone())
        };
        SyncLoop::new(source, self.view.clone(), self.poll_interval)
            .with_favorites(self.store.clone())
    }

    /// Run one reconciliation pass now.
    pub async fn sync_now(&self) -> Result<(), NexaError> {
        self.sync_loop().tick().await
    }

    /// Spawn the sync loop and the bus listener. Both stop on `cancel`.
    pub fn spawn_background(&self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        vec![
            self.sync_loop().spawn(cancel.clone()),
            sync::spawn_bus_listener(self.bus.subscribe(), self.view.clone(), cancel),
        ]
    }

    async fn require_user(&self) -> Result<User, NexaError> {
        self.user()
            .await
            .ok_or_else(|| NexaError::Forbidden("login required".to_string()))
    }

    async fn admin_credentials(&self) -> Result<AdminCredentials, NexaError> {
        helpdesk::require_admin(&self.require_user().await?)?;
        self.admin
            .read()
            .await
            .clone()
            .ok_or_else(|| NexaError::Forbidden("admin credentials unavailable".to_string()))
    }

    fn now_millis(&self) -> i64 {
        self.store.clock().now_millis()
    }

    /// Log in. Online the server decides the identity and role; local-only
    /// every well-formed email maps to a stable regular user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, NexaError> {
        let user = if self.is_online() {
            let user = self.remote.authenticate(email, password).await?;
            let admin = user.is_admin().then(|| AdminCredentials {
                email: email.to_string(),
                password: password.to_string(),
            });
            *self.admin.write().await = admin;
            user
        } else {
            if !is_valid_email(email) {
                return Err(NexaError::Validation(format!("`{email}` is not an email")));
            }
            self.store
                .local_user(email, |seed| dicebear_avatar("avataaars", seed))
                .await?
        };

        self.store.save_session(&user).await?;
        *self.session.write().await = Some(user.clone());
        info!(user = %user.name, role = %user.role, "logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), NexaError> {
        self.store.clear_session().await?;
        *self.session.write().await = None;
        *self.admin.write().await = None;
        info!("logged out");
        Ok(())
    }

    async fn persist_message(&self, message: &Message) -> Result<(), NexaError> {
        if self.is_online() {
            self.remote.send_message(message).await
        } else {
            self.store.append_message(message).await.map(|_| ())
        }
    }

    /// Send a chat message.
    ///
    /// The message lands in the view first, is then persisted, and finally
    /// published to sibling contexts. A `.Brat` command adds a bot reply
    /// that is published after [`chat::BOT_REPLY_DELAY`]. Once the user
    /// message is stored the send succeeds even if the reply is not.
    pub async fn send_message(&self, draft: Draft) -> Result<Message, NexaError> {
        let user = self.require_user().await?;
        let mut guard = self.guard.lock().await;
        guard.check()?;

        let message = chat::compose(&user, &draft, self.now_millis())?;
        let reply = chat::bot_reply(&message);

        self.view.write().await.push_message(message.clone());
        if let Err(e) = self.persist_message(&message).await {
            self.view.write().await.remove_message(&message.id);
            return Err(e);
        }

        guard.record();
        self.bus.publish(BusEvent::NewMessage(message.clone()));
        if let Some(reply) = reply {
            match self.persist_message(&reply).await {
                Ok(()) => {
                    self.view.write().await.push_message(reply.clone());
                    chat::publish_later(self.bus.clone(), reply, chat::BOT_REPLY_DELAY);
                }
                Err(e) => warn!(id = %reply.id, error = %e, "bot reply not stored"),
            }
        }
        Ok(message)
    }

    pub async fn toggle_favorite_sticker(&self, url: &str) -> Result<Vec<String>, NexaError> {
        let favorites = self.store.toggle_favorite_sticker(url).await?;
        self.view
            .write()
            .await
            .set_favorite_stickers(favorites.clone());
        Ok(favorites)
    }

    pub async fn create_ticket(&self, subject: &str) -> Result<Ticket, NexaError> {
        let user = self.require_user().await?;
        let ticket = helpdesk::new_ticket(&user, subject, self.now_millis())?;
        if self.is_online() {
            self.remote.send_ticket(&ticket).await?;
        } else {
            let mut tickets = self.store.read().await?.tickets;
            tickets.insert(0, ticket.clone());
            self.store
                .write(SnapshotPatch {
                    tickets: Some(tickets),
                    ..SnapshotPatch::default()
                })
                .await?;
        }
        self.view.write().await.push_ticket(ticket.clone());
        info!(id = %ticket.id, "ticket created");
        Ok(ticket)
    }

    /// Tickets the logged-in user may see.
    pub async fn visible_tickets(&self) -> Result<Vec<Ticket>, NexaError> {
        let user = self.require_user().await?;
        let view = self.view.read().await;
        Ok(helpdesk::visible_tickets(&user, view.tickets())
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn create_suggestion(&self, content: &str) -> Result<Suggestion, NexaError> {
        let user = self.require_user().await?;
        let suggestion = helpdesk::new_suggestion(&user, content, self.now_millis())?;
        if self.is_online() {
            self.remote.send_suggestion(&suggestion).await?;
        } else {
            let mut suggestions = self.store.read().await?.suggestions;
            suggestions.insert(0, suggestion.clone());
            self.store
                .write(SnapshotPatch {
                    suggestions: Some(suggestions),
                    ..SnapshotPatch::default()
                })
                .await?;
        }
        self.view.write().await.push_suggestion(suggestion.clone());
        Ok(suggestion)
    }

    pub async fn close_ticket(&self, id: &str) -> Result<(), NexaError> {
        let admin = self.admin_credentials().await?;
        self.remote.close_ticket(id, &admin).await?;
        self.view.write().await.close_ticket(id);
        info!(id, status = %TicketStatus::Closed, "ticket closed");
        Ok(())
    }

    pub async fn delete_ticket(&self, id: &str) -> Result<(), NexaError> {
        let admin = self.admin_credentials().await?;
        self.remote.delete_ticket(id, &admin).await?;
        self.view.write().await.remove_ticket(id);
        info!(id, "ticket deleted");
        Ok(())
    }

    pub async fn delete_suggestion(&self, id: &str) -> Result<(), NexaError> {
        let admin = self.admin_credentials().await?;
        self.remote.delete_suggestion(id, &admin).await?;
        self.view.write().await.remove_suggestion(id);
        info!(id, "suggestion deleted");
        Ok(())
    }

    /// Change the display name and optionally the avatar of the logged-in
    /// user. A new avatar must pass [`profile::validate_avatar_upload`] and
    /// is stored inline as a `data:` URL.
    pub async fn update_profile(
        &self,
        name: &str,
        avatar: Option<AvatarUpload<'_>>,
    ) -> Result<User, NexaError> {
        let user = self.require_user().await?;
        let avatar = avatar
            .map(|upload| profile::avatar_data_url(upload.content_type, upload.bytes))
            .transpose()?;
        let updated = profile::apply_profile(&user, name, avatar)?;
        self.store.save_session(&updated).await?;
        *self.session.write().await = Some(updated.clone());
        info!(user = %updated.name, "profile updated");
        Ok(updated)
    }
}
