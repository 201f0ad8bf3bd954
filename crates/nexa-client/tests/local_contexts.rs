// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-only contexts sharing one SQLite-backed store file and one bus.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use nexa_bus::EventBus;
use nexa_client::{Draft, LocalStore, NexaClient};
use nexa_config::model::{NexaConfig, StorageConfig};
use nexa_core::{
    KeyValueStore, ManualClock, Message, RemoteSource, RetentionPolicy, Role, SnapshotPatch,
    StorageAdapter,
};
use nexa_storage::SqliteStorage;
use nexa_test_utils::MockRemote;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn local_config(dir: &TempDir) -> NexaConfig {
    let mut config = NexaConfig::default();
    config.client.force_local = true;
    config.client.poll_interval_secs = 1;
    config.client.local_db_path = dir.path().join("local.db").to_string_lossy().to_string();
    config
}

async fn local_context(config: &NexaConfig, bus: &EventBus) -> NexaClient {
    let store = nexa_client::open_local_store(config).await.unwrap();
    let remote: Arc<dyn RemoteSource> = Arc::new(MockRemote::new());
    NexaClient::start(config, remote, store, bus.handle())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn contexts_share_the_snapshot_and_the_bus() {
    let dir = TempDir::new().unwrap();
    let config = local_config(&dir);
    let bus = EventBus::default();

    let first = local_context(&config, &bus).await;
    let second = local_context(&config, &bus).await;
    let cancel = CancellationToken::new();
    let _tasks = second.spawn_background(cancel.clone());

    first.login("erin@nexa.id", "x").await.unwrap();
    let sent = first.send_message(Draft::text("from tab one")).await.unwrap();

    let view = second.view();
    let mut delivered = false;
    for _ in 0..50 {
        if view.read().await.messages().iter().any(|m| m.id == sent.id) {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(delivered, "second context never saw the message");

    let snapshot = second.store().read().await.unwrap();
    assert_eq!(snapshot.messages.len(), 1);
    cancel.cancel();
}

#[tokio::test]
async fn retention_sweeps_the_sqlite_snapshot() {
    let dir = TempDir::new().unwrap();
    let storage = SqliteStorage::new(StorageConfig {
        database_path: dir.path().join("kv.db").to_string_lossy().to_string(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    let kv: Arc<dyn KeyValueStore> = Arc::new(storage);

    let today_0705 = DateTime::parse_from_rfc3339("2026-03-02T07:05:00+07:00").unwrap();
    let yesterday_0800 = DateTime::parse_from_rfc3339("2026-03-01T08:00:00+07:00").unwrap();
    let store = LocalStore::new(
        kv,
        Arc::new(ManualClock::new(today_0705)),
        RetentionPolicy::default(),
    );
    store
        .write(SnapshotPatch {
            messages: Some(vec![Message {
                id: "a".into(),
                user_id: "u1".into(),
                user_name: "ALICE".into(),
                user_avatar: String::new(),
                text: "old".into(),
                image_url: None,
                sticker_url: None,
                timestamp: 100,
                role: Role::User,
            }]),
            last_reset: Some(yesterday_0800.to_utc()),
            ..SnapshotPatch::default()
        })
        .await
        .unwrap();

    assert!(store.apply_retention_policy().await.unwrap());
    let snapshot = store.read().await.unwrap();
    assert!(snapshot.messages.is_empty());
    assert_eq!(snapshot.last_reset, today_0705.to_utc());
    assert!(!store.apply_retention_policy().await.unwrap());
}
