//! Gate behavior over the full router: extraction precedence, denial
//! classes, and the detached usage stamp.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use tower::ServiceExt;

use common::MockStore;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_bearer(uri: &str, secret: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {secret}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn missing_credential_denies_without_a_store_lookup() {
    let store = Arc::new(MockStore::default());
    let app = common::app(store.clone());

    let response = app.oneshot(get("/api/insights/usage")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.lookup_count(), 0);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn bearer_header_takes_precedence_over_api_key_header() {
    let store = Arc::new(MockStore::default());
    let (insights_secret, _) = store.seed("insights-svc", &["read:insights"], true, None);
    let (health_secret, _) = store.seed("health-svc", &["read:health"], true, None);
    let app = common::app(store.clone());

    // Both credentials presented; only the bearer one can authorize the
    // insights path. A 200 proves the bearer secret was the one resolved.
    let request = Request::builder()
        .uri("/api/insights/usage")
        .header(header::AUTHORIZATION, format!("Bearer {insights_secret}"))
        .header("x-api-key", &health_secret)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Swapped: the bearer credential lacks read:health, so even though the
    // X-API-Key credential would be sufficient, the request is forbidden.
    let request = Request::builder()
        .uri("/api/health")
        .header(header::AUTHORIZATION, format!("Bearer {insights_secret}"))
        .header("x-api-key", &health_secret)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn query_parameter_extraction_works() {
    let store = Arc::new(MockStore::default());
    let (secret, _) = store.seed("svc", &["read:health"], true, None);
    let app = common::app(store);

    let response = app
        .oneshot(get(&format!("/api/health?token={secret}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn insights_grant_reaches_insights_but_not_admin() {
    let store = Arc::new(MockStore::default());
    let (secret, _) = store.seed("svc", &["read:insights"], true, None);
    let app = common::app(store);

    let response = app
        .clone()
        .oneshot(get_with_bearer("/api/insights/usage", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_with_bearer("/api/admin/tokens", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn universal_override_reaches_every_route() {
    let store = Arc::new(MockStore::default());
    let (secret, _) = store.seed("root", &["admin:all"], true, None);
    let app = common::app(store);

    for uri in [
        "/api/insights/usage",
        "/api/insights/summary",
        "/api/health",
        "/api/admin/tokens",
    ] {
        let response = app
            .clone()
            .oneshot(get_with_bearer(uri, &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "expected 200 on {uri}");
    }
}

#[tokio::test]
async fn manage_tokens_grant_is_admin_but_not_insights() {
    let store = Arc::new(MockStore::default());
    let (secret, _) = store.seed("token-admin", &["manage:tokens"], true, None);
    let app = common::app(store);

    let response = app
        .clone()
        .oneshot(get_with_bearer("/api/admin/tokens", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_with_bearer("/api/insights/usage", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_credential_is_unauthorized_even_while_active() {
    let store = Arc::new(MockStore::default());
    let (secret, _) = store.seed(
        "stale",
        &["read:insights"],
        true,
        Some(Utc::now() - chrono::Duration::hours(1)),
    );
    let app = common::app(store);

    let response = app
        .oneshot(get_with_bearer("/api/insights/usage", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_credential_is_unauthorized_before_expiry() {
    let store = Arc::new(MockStore::default());
    let (secret, _) = store.seed(
        "revoked",
        &["read:insights"],
        false,
        Some(Utc::now() + chrono::Duration::days(30)),
    );
    let app = common::app(store);

    let response = app
        .oneshot(get_with_bearer("/api/insights/usage", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_secret_and_store_failure_answer_identically() {
    let store = Arc::new(MockStore::default());
    let app = common::app(store.clone());

    let unknown = app
        .clone()
        .oneshot(get_with_bearer("/api/insights/usage", "meter_deadbeef"))
        .await
        .unwrap();

    store.fail_lookups.store(true, Ordering::SeqCst);
    let failing = app
        .oneshot(get_with_bearer("/api/insights/usage", "meter_deadbeef"))
        .await
        .unwrap();

    // Same status and same body: the caller cannot tell "bad token" from
    // "store down". Operators can, via the server-side log classification.
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(failing.status(), StatusCode::UNAUTHORIZED);

    let unknown_body = axum::body::to_bytes(unknown.into_body(), usize::MAX)
        .await
        .unwrap();
    let failing_body = axum::body::to_bytes(failing.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(unknown_body, failing_body);
}

#[tokio::test]
async fn allowed_requests_stamp_last_used_out_of_band() {
    let store = Arc::new(MockStore::default());
    let (secret, id) = store.seed("svc", &["read:insights"], true, None);
    let app = common::app(store.clone());

    let response = app
        .oneshot(get_with_bearer("/api/insights/usage", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The stamp is applied by the background worker, not the request path.
    for _ in 0..100 {
        if store.last_used_of(id).is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("last_used was never stamped");
}

#[tokio::test]
async fn denied_requests_do_not_stamp_last_used() {
    let store = Arc::new(MockStore::default());
    let (secret, id) = store.seed("svc", &["read:health"], true, None);
    let app = common::app(store.clone());

    let response = app
        .oneshot(get_with_bearer("/api/insights/usage", &secret))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.last_used_of(id), None);
}

#[tokio::test]
async fn liveness_probe_needs_no_credential() {
    let store = Arc::new(MockStore::default());
    let app = common::app(store);

    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
