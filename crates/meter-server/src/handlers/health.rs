//! Liveness and gated health endpoints.

use axum::Json;
use serde_json::{Value, json};

/// Public liveness probe.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "service": "meter-server" }))
}

/// Token-gated health report (requires read:health).
pub async fn api_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
