// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed publish/subscribe between client contexts.
//!
//! Every context owns a [`BusHandle`] on a shared [`EventBus`]. Publishing
//! fans an event out to every *other* handle's subscriptions; a context never
//! hears its own events. Delivery is at-most-once and only reaches
//! subscriptions that already exist when the event is sent.

use nexa_core::types::Message;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

/// Name of the logical channel all contexts share.
pub const CHANNEL_NAME: &str = "nexa_chat_sync";

/// Default number of events a slow subscriber may fall behind by.
pub const DEFAULT_CAPACITY: usize = 256;

/// Events exchanged between contexts.
///
/// Serialized as `{"type": "NEW_MESSAGE", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusEvent {
    /// A message was sent by another context.
    NewMessage(Message),
}

impl BusEvent {
    /// Id of the entity carried by the event, used for dedup and logging.
    pub fn entity_id(&self) -> &str {
        match self {
            BusEvent::NewMessage(msg) => &msg.id,
        }
    }
}

#[derive(Debug, Clone)]
struct Envelope {
    origin: Uuid,
    event: BusEvent,
}

/// The shared broadcast medium.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Envelope>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Register a new context on the bus.
    pub fn handle(&self) -> BusHandle {
        BusHandle {
            origin: Uuid::new_v4(),
            tx: self.tx.clone(),
        }
    }

    /// Number of live subscriptions across all contexts.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// One context's connection to the bus.
#[derive(Debug, Clone)]
pub struct BusHandle {
    origin: Uuid,
    tx: broadcast::Sender<Envelope>,
}

impl BusHandle {
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    /// Fan `event` out to the other contexts.
    ///
    /// Returns how many subscriptions were reached, counting the sender's
    /// own (which will skip it). Publishing with no subscribers is not an error.
    pub fn publish(&self, event: BusEvent) -> usize {
        let id = event.entity_id().to_string();
        match self.tx.send(Envelope {
            origin: self.origin,
            event,
        }) {
            Ok(reached) => {
                debug!(channel = CHANNEL_NAME, id = %id, reached, "event published");
                reached
            }
            Err(_) => {
                debug!(channel = CHANNEL_NAME, id = %id, "event published with no listeners");
                0
            }
        }
    }

    /// Start listening. Only events sent after this call are delivered.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            origin: self.origin,
            rx: self.tx.subscribe(),
        }
    }
}

/// A stream of events published by other contexts.
#[derive(Debug)]
pub struct Subscription {
    origin: Uuid,
    rx: broadcast::Receiver<Envelope>,
}

impl Subscription {
    /// Wait for the next foreign event. Returns `None` once the bus is gone.
    ///
    /// If this subscription fell behind, the missed events are skipped with
    /// a warning and the next available event is returned.
    pub async fn recv(&mut self) -> Option<BusEvent> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if envelope.origin == self.origin => continue,
                Ok(envelope) => return Some(envelope.event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(channel = CHANNEL_NAME, skipped, "bus subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<BusEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) if envelope.origin == self.origin => continue,
                Ok(envelope) => return Some(envelope.event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(channel = CHANNEL_NAME, skipped, "bus subscriber lagged, events dropped");
                }
                Err(_) => return None,
            }
        }
    }
}
