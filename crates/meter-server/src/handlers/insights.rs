//! Insight endpoints.
//!
//! Aggregation itself is a downstream collaborator; these handlers exist to
//! exercise the gated surface and acknowledge who was admitted.

use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::middleware::gate::CredentialContext;

pub async fn usage(Extension(ctx): Extension<CredentialContext>) -> Json<Value> {
    Json(json!({ "insight": "usage", "requested_by": ctx.name }))
}

pub async fn summary(Extension(ctx): Extension<CredentialContext>) -> Json<Value> {
    Json(json!({ "insight": "summary", "requested_by": ctx.name }))
}
