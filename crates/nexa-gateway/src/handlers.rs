// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for `/api` and `/health`.
//!
//! `/api` is a single endpoint multiplexed by an `action` name, taken from
//! the query string or from the JSON body (the query wins). A request with
//! no action gets the ping payload; an unknown action gets 403.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nexa_core::api::{
    Action, AdminTarget, ApiRequest, AuthConfigInfo, AuthRequest, AuthResponse, MessagePayload,
    NETWORK_NAME, Success, SuggestionPayload, TicketPayload,
};
use nexa_core::{HealthStatus, NexaError, PingStatus, VERSION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth;
use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ApiQuery {
    #[serde(default)]
    pub action: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /api
pub async fn get_api(State(state): State<AppState>, Query(query): Query<ApiQuery>) -> Response {
    dispatch(&state, query.action.as_deref(), serde_json::Value::Null).await
}

/// POST /api
pub async fn post_api(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
    body: Bytes,
) -> Response {
    let request: ApiRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ApiRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                return ApiError::from(NexaError::Validation(format!(
                    "malformed request body: {e}"
                )))
                .into_response();
            }
        }
    };
    let action = query.action.or(request.action);
    dispatch(&state, action.as_deref(), request.payload).await
}

/// OPTIONS /api
pub async fn options_api() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => "ok",
        _ => "degraded",
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn dispatch(state: &AppState, action: Option<&str>, payload: serde_json::Value) -> Response {
    let Some(name) = action else {
        return ping(state).await;
    };
    let Ok(action) = Action::from_str(name) else {
        debug!(action = name, "rejected unknown action");
        return ApiError::Restricted.into_response();
    };
    debug!(%action, "dispatching");
    match handle(state, action, payload).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn ping(state: &AppState) -> Response {
    let (code, status) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "active"),
        Ok(other) => {
            debug!(health = ?other, "storage not healthy");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
        Err(e) => {
            debug!(error = %e, "storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };
    let body = PingStatus {
        status: status.to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        version: VERSION.to_string(),
    };
    (code, Json(body)).into_response()
}

fn parse<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| NexaError::Validation(format!("invalid payload: {e}")).into())
}

fn require(condition: bool, message: &str) -> Result<(), ApiError> {
    if condition {
        Ok(())
    } else {
        Err(NexaError::Validation(message.to_string()).into())
    }
}

fn found(found: bool, kind: &'static str, id: String) -> Result<Response, ApiError> {
    if found {
        Ok(Json(Success::OK).into_response())
    } else {
        Err(NexaError::NotFound { kind, id }.into())
    }
}

async fn handle(
    state: &AppState,
    action: Action,
    payload: serde_json::Value,
) -> Result<Response, ApiError> {
    let storage = state.storage.as_ref();
    let response = match action {
        Action::Ping => ping(state).await,
        Action::AuthConfig => Json(AuthConfigInfo {
            version: VERSION.to_string(),
            network: NETWORK_NAME.to_string(),
        })
        .into_response(),
        Action::Auth => {
            let request: AuthRequest = parse(payload)?;
            let user = auth::authenticate(storage, &state.admin, &request).await?;
            Json(AuthResponse { user }).into_response()
        }
        Action::GetMessages => Json(storage.recent_messages(state.message_cap).await?).into_response(),
        Action::SendMessage => {
            let MessagePayload { message } = parse(payload)?;
            require(!message.id.is_empty(), "message id is empty")?;
            require(!message.user_id.is_empty(), "message userId is empty")?;
            require(message.has_content(), "message is empty")?;
            if !storage.insert_message(&message).await? {
                debug!(id = %message.id, "duplicate message ignored");
            }
            Json(Success::OK).into_response()
        }
        Action::GetTickets => Json(storage.list_tickets().await?).into_response(),
        Action::SendTicket => {
            let TicketPayload { ticket } = parse(payload)?;
            require(!ticket.id.is_empty(), "ticket id is empty")?;
            require(!ticket.subject.trim().is_empty(), "ticket subject is empty")?;
            storage.insert_ticket(&ticket).await?;
            Json(Success::OK).into_response()
        }
        Action::CloseTicket => {
            let target: AdminTarget = parse(payload)?;
            state.admin.verify(&target.credentials)?;
            found(storage.close_ticket(&target.id).await?, "ticket", target.id)?
        }
        Action::DeleteTicket => {
            let target: AdminTarget = parse(payload)?;
            state.admin.verify(&target.credentials)?;
            found(storage.delete_ticket(&target.id).await?, "ticket", target.id)?
        }
        Action::GetSuggestions => Json(storage.list_suggestions().await?).into_response(),
        Action::SendSuggestion => {
            let SuggestionPayload { suggestion } = parse(payload)?;
            require(!suggestion.id.is_empty(), "suggestion id is empty")?;
            require(!suggestion.content.trim().is_empty(), "suggestion is empty")?;
            storage.insert_suggestion(&suggestion).await?;
            Json(Success::OK).into_response()
        }
        Action::DeleteSuggestion => {
            let target: AdminTarget = parse(payload)?;
            state.admin.verify(&target.credentials)?;
            found(
                storage.delete_suggestion(&target.id).await?,
                "suggestion",
                target.id,
            )?
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_query_defaults_to_no_action() {
        let query: ApiQuery = serde_json::from_str("{}").unwrap();
        assert!(query.action.is_none());
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn parse_reports_bad_payloads_as_validation() {
        let err = parse::<AuthRequest>(serde_json::json!({"email": 1})).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
