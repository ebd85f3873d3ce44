//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Request-level errors, rendered as `{"error": <code>, "message": <text>}`.
///
/// Denial bodies are deliberately uniform: a missing, unknown, revoked, or
/// expired credential and a failed store lookup all produce the same
/// `unauthorized` payload, so the response cannot be used to probe which
/// case occurred. The submitted secret never appears in a body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("valid API credential required")]
    Unauthorized,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(err) => {
                // The detail stays on the server log.
                tracing::error!(error = %err, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (
            self.status(),
            Json(json!({ "error": self.code(), "message": message })),
        )
            .into_response()
    }
}

impl From<meter_auth::AuthError> for ApiError {
    fn from(err: meter_auth::AuthError) -> Self {
        use meter_auth::AuthError;
        match &err {
            AuthError::EmptyName
            | AuthError::EmptyGrants
            | AuthError::UnknownCapability(_)
            | AuthError::InvalidExpiration(_) => ApiError::BadRequest(err.to_string()),
            AuthError::CredentialInvalid(_) => ApiError::Unauthorized,
            AuthError::RandomUnavailable(_) | AuthError::Store(_) => {
                ApiError::Internal(err.into())
            }
        }
    }
}
