// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic reconciliation of the view against its authoritative source.
//!
//! Each tick fetches the full collections and replaces the view wholesale.
//! There is no delta fetch: a tick against an unchanged source leaves the
//! view exactly as it was. A failed tick is logged and the view is left
//! alone; the loop keeps ticking until cancelled. Favourite stickers live
//! only in the local snapshot and are re-read from it on every tick.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nexa_bus::Subscription;
use nexa_core::{Message, NexaError, RemoteSource, Suggestion, Ticket};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::store::LocalStore;
use crate::view::SharedView;

/// Everything one tick replaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub messages: Vec<Message>,
    pub tickets: Vec<Ticket>,
    pub suggestions: Vec<Suggestion>,
}

/// Where a sync tick reads its collections from.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    fn label(&self) -> &'static str;

    /// Maintenance run before every fetch.
    async fn prepare(&self) -> Result<(), NexaError> {
        Ok(())
    }

    async fn fetch(&self) -> Result<Collections, NexaError>;
}

/// The remote API as a collection source.
pub struct RemoteCollections {
    remote: Arc<dyn RemoteSource>,
}

impl RemoteCollections {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        Self { remote }
    }
}

#[async_trait]
impl CollectionSource for RemoteCollections {
    fn label(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self) -> Result<Collections, NexaError> {
        let (messages, tickets, suggestions) = tokio::try_join!(
            self.remote.fetch_messages(),
            self.remote.fetch_tickets(),
            self.remote.fetch_suggestions(),
        )?;
        Ok(Collections {
            messages,
            tickets,
            suggestions,
        })
    }
}

/// The local snapshot as a collection source, used in local-only mode.
#[async_trait]
impl CollectionSource for LocalStore {
    fn label(&self) -> &'static str {
        "local"
    }

    async fn prepare(&self) -> Result<(), NexaError> {
        self.apply_retention_policy().await.map(|_| ())
    }

    async fn fetch(&self) -> Result<Collections, NexaError> {
        let snapshot = self.read().await?;
        Ok(Collections {
            messages: snapshot.messages,
            tickets: snapshot.tickets,
            suggestions: snapshot.suggestions,
        })
    }
}

/// Fetch-and-replace loop for one context.
pub struct SyncLoop {
    source: Arc<dyn CollectionSource>,
    view: SharedView,
    interval: Duration,
    favorites: Option<LocalStore>,
}

impl SyncLoop {
    pub fn new(source: Arc<dyn CollectionSource>, view: SharedView, interval: Duration) -> Self {
        Self {
            source,
            view,
            interval,
            favorites: None,
        }
    }

    /// Also reconcile favourite stickers from `store` on every tick.
    pub fn with_favorites(mut self, store: LocalStore) -> Self {
        self.favorites = Some(store);
        self
    }

    /// One reconciliation pass. On error the view is untouched.
    pub async fn tick(&self) -> Result<(), NexaError> {
        if let Err(e) = self.source.prepare().await {
            warn!(source = self.source.label(), error = %e, "sync maintenance failed");
        }

        let fetched = self.source.fetch().await?;
        let favorites = match &self.favorites {
            Some(store) => Some(store.read().await?.favorite_stickers),
            None => None,
        };
        let mut view = self.view.write().await;
        view.replace_messages(fetched.messages);
        view.replace_tickets(fetched.tickets);
        view.replace_suggestions(fetched.suggestions);
        if let Some(favorites) = favorites {
            view.set_favorite_stickers(favorites);
        }
        debug!(
            source = self.source.label(),
            messages = view.messages().len(),
            "view reconciled"
        );
        Ok(())
    }

    /// Tick immediately, then every `interval`, until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            source = self.source.label(),
            interval_secs = self.interval.as_secs(),
            "sync loop started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!(source = self.source.label(), error = %e, "sync failed (non-fatal)");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("sync loop stopped");
                    break;
                }
            }
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

/// Apply events from other contexts to `view` until `cancel` fires or the bus closes.
pub fn spawn_bus_listener(
    mut subscription: Subscription,
    view: SharedView,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = subscription.recv() => {
                    let Some(event) = event else {
                        debug!("bus closed, listener exiting");
                        break;
                    };
                    let applied = view.write().await.apply_broadcast(&event);
                    debug!(id = event.entity_id(), applied, "broadcast received");
                }
                _ = cancel.cancelled() => break,
            }
        }
    })
}
