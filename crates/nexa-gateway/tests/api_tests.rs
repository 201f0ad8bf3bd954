// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing tests for the `/api` endpoint, driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use nexa_config::model::NexaConfig;
use nexa_core::StorageAdapter;
use nexa_gateway::{AppState, router};
use nexa_storage::{Database, SqliteStorage};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let storage = SqliteStorage::from_database(Database::open_in_memory().await.unwrap());
    let mut config = NexaConfig::default();
    config.auth.admin_email = Some("admin@nexa.id".into());
    config.auth.admin_password = Some("root-pw".into());
    config.server.message_cap = 3;
    router(AppState::new(Arc::new(storage), &config))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(body: Value) -> Request<Body> {
    Request::post("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn message(id: &str, timestamp: i64) -> Value {
    json!({
        "id": id, "userId": "u1", "userName": "ALICE", "userAvatar": "",
        "text": format!("msg {id}"), "timestamp": timestamp, "role": "user"
    })
}

fn ticket(id: &str, timestamp: i64) -> Value {
    json!({
        "id": id, "userId": "u1", "userName": "ALICE", "subject": "help",
        "status": "open", "timestamp": timestamp
    })
}

fn admin_target(action: &str, id: &str, password: &str) -> Value {
    json!({
        "action": action,
        "payload": {"id": id, "email": "admin@nexa.id", "password": password}
    })
}

#[tokio::test]
async fn ping_reports_active() {
    let app = app().await;
    let (status, body) = call(&app, get("/api?action=ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn missing_action_answers_with_ping() {
    let app = app().await;
    let (status, body) = call(&app, get("/api")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn uninitialized_storage_degrades_ping() {
    let storage = SqliteStorage::new(nexa_config::model::StorageConfig::default());
    let app = router(AppState::new(Arc::new(storage), &NexaConfig::default()));
    let (status, body) = call(&app, get("/api?action=ping")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn unknown_action_is_restricted() {
    let app = app().await;
    let (status, body) = call(&app, get("/api?action=drop_tables")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "RESTRICTED ACCESS");
}

#[tokio::test]
async fn auth_config_exposes_network() {
    let app = app().await;
    let (status, body) = call(&app, get("/api?action=auth_config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["network"], "NEXA-MAINNET");
}

#[tokio::test]
async fn options_is_ok() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api")
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = app().await;
    let request = Request::get("/api?action=ping")
        .header(header::ORIGIN, "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn query_action_wins_over_body() {
    let app = app().await;
    let request = Request::post("/api?action=auth_config")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"action": "drop_tables"}).to_string()))
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["network"], "NEXA-MAINNET");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app().await;
    let request = Request::post("/api")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn messages_are_capped_and_ascending() {
    let app = app().await;
    for (id, ts) in [("d", 4), ("a", 1), ("c", 3), ("b", 2)] {
        let (status, body) = call(
            &app,
            post(json!({"action": "send_message", "payload": {"message": message(id, ts)}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let (_, body) = call(&app, get("/api?action=get_messages&t=123")).await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["b", "c", "d"]);
}

#[tokio::test]
async fn duplicate_message_is_idempotent() {
    let app = app().await;
    let send = json!({"action": "send_message", "payload": {"message": message("x", 1)}});
    assert_eq!(call(&app, post(send.clone())).await.0, StatusCode::OK);
    assert_eq!(call(&app, post(send)).await.0, StatusCode::OK);
    let (_, body) = call(&app, get("/api?action=get_messages")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = app().await;
    let mut empty = message("e", 1);
    empty["text"] = json!("  ");
    let (status, _) = call(
        &app,
        post(json!({"action": "send_message", "payload": {"message": empty}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn auth_registers_users_and_guards_admin() {
    let app = app().await;
    let (status, body) = call(
        &app,
        post(json!({"action": "auth", "payload": {"email": "bob@nexa.id", "password": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");

    let (status, _) = call(
        &app,
        post(json!({"action": "auth", "payload": {"email": "bob", "password": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        post(json!({"action": "auth", "payload": {"email": "admin@nexa.id", "password": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        post(json!({"action": "auth", "payload": {"email": "admin@nexa.id", "password": "root-pw"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn tickets_list_newest_first_and_admin_actions_are_checked() {
    let app = app().await;
    for (id, ts) in [("t1", 1), ("t2", 2)] {
        let (status, _) = call(
            &app,
            post(json!({"action": "send_ticket", "payload": {"ticket": ticket(id, ts)}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = call(&app, get("/api?action=get_tickets")).await;
    assert_eq!(body[0]["id"], "t2");

    let (status, _) = call(&app, post(admin_target("close_ticket", "t1", "wrong"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, post(admin_target("close_ticket", "t1", "root-pw"))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, get("/api?action=get_tickets")).await;
    assert_eq!(body[1]["status"], "closed");

    let (status, _) = call(&app, post(admin_target("delete_ticket", "t1", "root-pw"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, post(admin_target("delete_ticket", "t1", "root-pw"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("t1"));
}

#[tokio::test]
async fn suggestions_round_trip_through_admin_delete() {
    let app = app().await;
    let suggestion = json!({
        "id": "s1", "userId": "u1", "userName": "ALICE", "userAvatar": "",
        "content": "more stickers", "timestamp": 5
    });
    let (status, _) = call(
        &app,
        post(json!({"action": "send_suggestion", "payload": {"suggestion": suggestion}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, get("/api?action=get_suggestions")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = call(&app, post(admin_target("delete_suggestion", "s1", "root-pw"))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, get("/api?action=get_suggestions")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_version_and_uptime() {
    let app = app().await;
    let (status, body) = call(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], nexa_core::VERSION);
}

#[tokio::test]
async fn storage_trait_object_is_shared() {
    let storage: Arc<dyn StorageAdapter> = Arc::new(SqliteStorage::from_database(
        Database::open_in_memory().await.unwrap(),
    ));
    let state = AppState::new(storage.clone(), &NexaConfig::default());
    assert!(Arc::ptr_eq(&state.storage, &storage));
}
