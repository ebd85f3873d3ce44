//! API credential gates.
//!
//! Two middlewares share the same extraction and resolution path:
//! [`api_gate`] authorizes against the capability mapped from the request
//! path, and [`admin_gate`] demands the token-management tier everywhere.
//! Each request runs extract → resolve → authorize in order and ends in
//! exactly one of allowed or denied.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Uri, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::net::SocketAddr;
use uuid::Uuid;

use meter_auth::{AuthError, Capability, GrantSet};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolved credential context, attached to allowed requests for downstream
/// handlers.
#[derive(Debug, Clone)]
pub struct CredentialContext {
    pub id: Uuid,
    pub name: String,
    pub grants: GrantSet,
}

/// Gate for token-scoped routes: the required capability comes from the
/// request path, and unmapped paths are denied outright.
pub async fn api_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let required = Capability::required_for_path(req.uri().path());
    run_gate(state, req, next, GateTier::Capability(required)).await
}

/// Gate for credential-administration routes: always demands the admin tier
/// (manage:tokens or admin:all), regardless of path.
pub async fn admin_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    run_gate(state, req, next, GateTier::Admin).await
}

enum GateTier {
    Capability(Option<Capability>),
    Admin,
}

async fn run_gate(
    state: AppState,
    mut req: Request,
    next: Next,
    tier: GateTier,
) -> Result<Response, ApiError> {
    // Extract. No candidate secret means no store lookup at all.
    let Some(secret) = extract_secret(req.headers(), req.uri()) else {
        log_denial(&req, "no credential presented");
        return Err(ApiError::Unauthorized);
    };

    // Resolve. Missing, revoked, and expired rows answer identically; a
    // store failure also denies, but with its own log classification so
    // operators can tell the cases apart.
    let credential = match state.credentials.authenticate(&secret).await {
        Ok(credential) => credential,
        Err(AuthError::CredentialInvalid(reason)) => {
            log_denial(&req, reason.as_str());
            return Err(ApiError::Unauthorized);
        }
        Err(AuthError::Store(err)) => {
            tracing::error!(
                error = %err,
                path = %req.uri().path(),
                "credential store failure during lookup"
            );
            log_denial(&req, "credential store unavailable");
            return Err(ApiError::Unauthorized);
        }
        Err(err) => {
            tracing::error!(error = %err, "unexpected authentication failure");
            log_denial(&req, "authentication failure");
            return Err(ApiError::Unauthorized);
        }
    };

    // Authorize against the grants persisted on the resolved row.
    let authorized = match tier {
        GateTier::Capability(Some(required)) => credential.grants.satisfies(required),
        GateTier::Capability(None) => false,
        GateTier::Admin => credential.grants.allows_admin(),
    };
    if !authorized {
        log_denial(&req, "insufficient grants");
        return Err(ApiError::Forbidden);
    }

    // Allowed: queue the usage stamp without awaiting it, then dispatch.
    state.usage.record(credential.id, Utc::now());

    req.extensions_mut().insert(CredentialContext {
        id: credential.id,
        name: credential.name,
        grants: credential.grants,
    });

    Ok(next.run(req).await)
}

/// Pull the candidate secret out of a request. Precedence, first match wins:
/// bearer header, dedicated key header, `token` query parameter.
fn extract_secret(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        && let Some(rest) = value.strip_prefix("Bearer ")
    {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Some(rest.to_string());
        }
    }

    if let Some(value) = headers.get("x-api-key").and_then(|h| h.to_str().ok()) {
        let value = value.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    query_param(uri, "token")
}

fn query_param(uri: &Uri, name: &str) -> Option<String> {
    for pair in uri.query()?.split('&') {
        let mut parts = pair.splitn(2, '=');
        if parts.next() == Some(name) {
            let value = parts.next().unwrap_or("").trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Structured denial log for the observability sink. Carries the requesting
/// address, client agent, and target path; the submitted secret is
/// deliberately absent.
fn log_denial(req: &Request, reason: &str) {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    tracing::warn!(
        remote = %remote,
        user_agent = %user_agent,
        path = %req.uri().path(),
        reason,
        "request denied"
    );
}
