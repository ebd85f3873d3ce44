//! Route table.

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::middleware::{dashboard, gate};
use crate::state::AppState;

/// Build the service router: a public liveness probe, token-gated API
/// routes, admin-gated credential management, and the operator dashboard.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/health", get(handlers::health::api_health))
        .route("/api/insights/usage", get(handlers::insights::usage))
        .route("/api/insights/summary", get(handlers::insights::summary))
        .layer(from_fn_with_state(state.clone(), gate::api_gate));

    let admin = Router::new()
        .route(
            "/api/admin/tokens",
            post(handlers::tokens::create).get(handlers::tokens::list),
        )
        .route("/api/admin/tokens/{id}", delete(handlers::tokens::revoke))
        .layer(from_fn_with_state(state.clone(), gate::admin_gate));

    let operator = Router::new()
        .route("/dashboard", get(handlers::dashboard::home))
        .layer(from_fn_with_state(state.clone(), dashboard::dashboard_gate));

    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .merge(api)
        .merge(admin)
        .merge(operator)
        .with_state(state)
}
