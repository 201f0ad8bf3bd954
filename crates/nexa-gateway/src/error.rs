// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nexa_core::NexaError;
use nexa_core::api::{ErrorBody, INTERNAL_ERROR, RESTRICTED};

/// Error returned by the `/api` handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The action is not one the endpoint serves.
    Restricted,
    Core(NexaError),
}

impl From<NexaError> for ApiError {
    fn from(e: NexaError) -> Self {
        ApiError::Core(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Restricted => StatusCode::FORBIDDEN,
            ApiError::Core(e) => match e {
                NexaError::Validation(_) => StatusCode::BAD_REQUEST,
                NexaError::Forbidden(_) => StatusCode::FORBIDDEN,
                NexaError::NotFound { .. } => StatusCode::NOT_FOUND,
                NexaError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Restricted => RESTRICTED.to_string(),
            ApiError::Core(NexaError::Validation(m) | NexaError::Forbidden(m)) => m,
            ApiError::Core(e) if status != StatusCode::INTERNAL_SERVER_ERROR => e.to_string(),
            ApiError::Core(e) => {
                tracing::error!(error = %e, "request failed");
                INTERNAL_ERROR.to_string()
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_status_codes() {
        let cases = [
            (ApiError::Restricted, StatusCode::FORBIDDEN),
            (NexaError::Validation("x".into()).into(), StatusCode::BAD_REQUEST),
            (NexaError::Forbidden("x".into()).into(), StatusCode::FORBIDDEN),
            (
                NexaError::NotFound {
                    kind: "ticket",
                    id: "t1".into(),
                }
                .into(),
                StatusCode::NOT_FOUND,
            ),
            (NexaError::Unavailable("db".into()).into(), StatusCode::SERVICE_UNAVAILABLE),
            (NexaError::Internal("boom".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error:?}");
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = ApiError::from(NexaError::Internal("secret path".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, INTERNAL_ERROR);
    }
}
