// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: real gateway on an ephemeral port, real HTTP remote,
//! client contexts sharing one bus.
//!
//! Each test starts an isolated TestHarness with its own temp SQLite files.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use nexa_bus::EventBus;
use nexa_client::{Draft, HttpRemote, LocalStore, MemoryKv, NexaClient};
use nexa_config::model::NexaConfig;
use nexa_core::{
    NexaError, RemoteSource, RetentionPolicy, StorageAdapter, SystemClock, TicketStatus,
};
use nexa_test_utils::{TestHarness, fixtures};
use tokio_util::sync::CancellationToken;

fn client_config(harness: &TestHarness) -> NexaConfig {
    let mut config = harness.config.clone();
    config.client.poll_interval_secs = 1;
    config
}

fn memory_store() -> LocalStore {
    LocalStore::new(
        Arc::new(MemoryKv::new()),
        Arc::new(SystemClock),
        RetentionPolicy::default(),
    )
}

async fn context(config: &NexaConfig, store: LocalStore, bus: &EventBus) -> NexaClient {
    let remote: Arc<dyn RemoteSource> = Arc::new(HttpRemote::new(&config.client.api_url).unwrap());
    NexaClient::start(config, remote, store, bus.handle())
        .await
        .unwrap()
}

/// Poll `check` for up to five seconds.
async fn eventually<F, Fut>(what: &str, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test(flavor = "multi_thread")]
async fn message_reaches_sibling_context_over_the_bus() {
    let harness = TestHarness::start().await.unwrap();
    let config = client_config(&harness);
    let bus = EventBus::default();

    let sender = context(&config, memory_store(), &bus).await;
    let receiver = context(&config, memory_store(), &bus).await;
    assert!(sender.is_online() && receiver.is_online());

    let cancel = CancellationToken::new();
    let _tasks = receiver.spawn_background(cancel.clone());

    sender.login("alice@nexa.id", "pw").await.unwrap();
    let sent = sender.send_message(Draft::text("hello tab")).await.unwrap();

    let view = receiver.view();
    eventually("broadcast delivery", || {
        let view = view.clone();
        let id = sent.id.clone();
        async move { view.read().await.messages().iter().any(|m| m.id == id) }
    })
    .await;

    let stored = harness.storage.recent_messages(10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, "hello tab");
    cancel.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_loop_picks_up_messages_written_elsewhere() {
    let harness = TestHarness::start().await.unwrap();
    let config = client_config(&harness);
    let bus = EventBus::default();
    let client = context(&config, memory_store(), &bus).await;

    let cancel = CancellationToken::new();
    let _tasks = client.spawn_background(cancel.clone());

    harness
        .storage
        .insert_message(&fixtures::message("elsewhere", 42))
        .await
        .unwrap();

    let view = client.view();
    eventually("sync tick", || {
        let view = view.clone();
        async move { view.read().await.messages().iter().any(|m| m.id == "elsewhere") }
    })
    .await;
    cancel.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn bot_command_round_trips_through_the_server() {
    let harness = TestHarness::start().await.unwrap();
    let config = client_config(&harness);
    let bus = EventBus::default();
    let client = context(&config, memory_store(), &bus).await;

    client.login("alice@nexa.id", "pw").await.unwrap();
    client.send_message(Draft::text(".Brat hello world")).await.unwrap();

    let stored = harness.storage.recent_messages(10).await.unwrap();
    assert_eq!(stored.len(), 2);
    let bot = &stored[1];
    assert_eq!(bot.user_id, "nexa-bot");
    assert!(bot.image_url.as_deref().unwrap().ends_with("text=hello+world"));
    assert_eq!(bot.timestamp, stored[0].timestamp + 500);
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_moderates_tickets_through_the_api() {
    let harness = TestHarness::builder()
        .with_admin("admin@nexa.id", "root-pw")
        .build()
        .await
        .unwrap();
    let config = client_config(&harness);
    let bus = EventBus::default();
    let client = context(&config, memory_store(), &bus).await;

    client.login("bob@nexa.id", "pw").await.unwrap();
    let ticket = client.create_ticket("cannot upload avatar").await.unwrap();
    let suggestion = client.create_suggestion("dark mode").await.unwrap();
    assert!(matches!(
        client.close_ticket(&ticket.id).await,
        Err(NexaError::Forbidden(_))
    ));

    client.login("admin@nexa.id", "root-pw").await.unwrap();
    client.close_ticket(&ticket.id).await.unwrap();
    assert_eq!(
        harness.storage.list_tickets().await.unwrap()[0].status,
        TicketStatus::Closed
    );

    client.delete_suggestion(&suggestion.id).await.unwrap();
    assert!(harness.storage.list_suggestions().await.unwrap().is_empty());

    client.delete_ticket(&ticket.id).await.unwrap();
    assert!(matches!(
        client.delete_ticket(&ticket.id).await,
        Err(NexaError::NotFound { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_admin_password_is_refused() {
    let harness = TestHarness::builder()
        .with_admin("admin@nexa.id", "root-pw")
        .build()
        .await
        .unwrap();
    let config = client_config(&harness);
    let client = context(&config, memory_store(), &EventBus::default()).await;

    let err = client.login("admin@nexa.id", "guess").await.unwrap_err();
    assert!(matches!(err, NexaError::Forbidden(_)));
    assert!(client.user().await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_falls_back_to_local_only() {
    let harness = TestHarness::start().await.unwrap();
    let mut config = client_config(&harness);
    config.client.api_url = "http://127.0.0.1:9/api".to_string();
    config.client.boot_retries = 0;
    config.client.boot_timeout_secs = 1;

    let store = nexa_client::open_local_store(&config).await.unwrap();
    let client = context(&config, store.clone(), &EventBus::default()).await;
    assert!(!client.is_online());

    client.login("carol@nexa.id", "anything").await.unwrap();
    client.send_message(Draft::text("offline note")).await.unwrap();

    let snapshot = store.read().await.unwrap();
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].text, "offline note");
    assert!(harness.storage.recent_messages(10).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_is_restored_from_the_sqlite_store() {
    let harness = TestHarness::start().await.unwrap();
    let config = client_config(&harness);
    let bus = EventBus::default();

    let store = nexa_client::open_local_store(&config).await.unwrap();
    let first = context(&config, store.clone(), &bus).await;
    let user = first.login("dave@nexa.id", "pw").await.unwrap();
    drop(first);

    let second = context(&config, store, &bus).await;
    assert_eq!(second.user().await.map(|u| u.id), Some(user.id));
}

#[tokio::test(flavor = "multi_thread")]
async fn message_cap_limits_the_fetch() {
    let harness = TestHarness::builder()
        .with_message_cap(2)
        .build()
        .await
        .unwrap();
    for (id, ts) in [("a", 1), ("b", 2), ("c", 3)] {
        harness
            .storage
            .insert_message(&fixtures::message(id, ts))
            .await
            .unwrap();
    }

    let remote = HttpRemote::new(harness.api_url()).unwrap();
    let ids: Vec<_> = remote
        .fetch_messages()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, ["b", "c"]);
}
