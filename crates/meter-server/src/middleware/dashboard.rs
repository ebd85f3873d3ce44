//! Operator dashboard gate.
//!
//! Stateless check of a request's Basic-auth pair against two configured
//! values. No token lifecycle and no store dependency; if either value is
//! unconfigured the gate fails closed.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use meter_core::DashboardConfig;

use crate::state::AppState;

/// Single-operator credential check, fixed at startup.
///
/// Holds the resolved configuration values; request handling never consults
/// the process environment.
pub struct DashboardAuth {
    username: Option<String>,
    password: Option<String>,
}

impl DashboardAuth {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            username: config.username,
            password: config.password,
        }
    }

    /// Whether both operator credentials are configured.
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Check a submitted pair. Denies unconditionally when either configured
    /// value is missing; both comparisons run regardless of the first's
    /// outcome.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let (Some(expected_user), Some(expected_pass)) = (&self.username, &self.password) else {
            return false;
        };
        let user_ok = constant_time_eq(username, expected_user);
        let pass_ok = constant_time_eq(password, expected_pass);
        user_ok & pass_ok
    }
}

/// Compare SHA-256 digests so the comparison is fixed-length no matter how
/// the inputs differ in length or mismatch position.
fn constant_time_eq(submitted: &str, expected: &str) -> bool {
    let a = Sha256::digest(submitted.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.as_slice().ct_eq(b.as_slice()).into()
}

pub async fn dashboard_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.dashboard.is_configured() {
        tracing::warn!(
            path = %req.uri().path(),
            "dashboard credentials not configured, access denied"
        );
        return challenge();
    }

    match basic_credentials(req.headers()) {
        Some((username, password)) if state.dashboard.verify(&username, &password) => {
            next.run(req).await
        }
        _ => {
            tracing::warn!(path = %req.uri().path(), "dashboard authentication failed");
            challenge()
        }
    }
}

/// Parse an `Authorization: Basic` header into its credential pair.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// 401 with the Basic challenge browsers expect.
fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [
            (header::WWW_AUTHENTICATE, r#"Basic realm="Meter Dashboard""#),
            (header::CONTENT_TYPE, "application/json"),
        ],
        r#"{"error":"unauthorized","message":"operator credentials required"}"#,
    )
        .into_response()
}
