//! Credential administration endpoints.
//!
//! All three sit behind the admin gate. Creation is the only place the
//! plaintext token is ever rendered; listing returns metadata only.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meter_auth::{Credential, IssueRequest, IssuedCredential};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTokenRequest {
    pub name: String,
    pub permissions: Vec<String>,
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Response for a newly created credential. `token` is shown here once and
/// is not retrievable afterwards.
#[derive(Debug, Serialize)]
pub struct CreateTokenResponse {
    pub token: String,
    pub token_id: Uuid,
    #[serde(flatten)]
    pub credential: Credential,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTokenRequest>,
) -> Result<Json<CreateTokenResponse>, ApiError> {
    let IssuedCredential { secret, credential } = state
        .credentials
        .issue(IssueRequest {
            name: body.name,
            grants: body.permissions,
            expires_in: body.expires_in,
        })
        .await?;

    Ok(Json(CreateTokenResponse {
        token: secret,
        token_id: credential.id,
        credential,
    }))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Credential>>, ApiError> {
    Ok(Json(state.credentials.list().await?))
}

#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub status: &'static str,
    pub message: String,
}

pub async fn revoke(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RevokeResponse>, ApiError> {
    if state.credentials.revoke(id).await? {
        Ok(Json(RevokeResponse {
            status: "success",
            message: "credential revoked".to_string(),
        }))
    } else {
        Err(ApiError::NotFound(format!("credential {id}")))
    }
}
