//! Probes and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use zenzebra_integration_tests::TestContext;

#[tokio::test]
async fn test_liveness() {
    let ctx = TestContext::new();
    let res = ctx.get("/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_follows_backend() {
    let ctx = TestContext::new();
    assert_eq!(ctx.get("/health/ready", None).await.status, StatusCode::OK);

    ctx.documents.set_offline(true);
    assert_eq!(
        ctx.get("/health/ready", None).await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_settings_fall_back_to_defaults_when_backend_is_down() {
    let ctx = TestContext::new();
    ctx.documents.set_offline(true);

    let res = ctx.get("/api/settings", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["siteName"], "ZenZebra");
    assert_eq!(res.body["maintenanceMode"], false);
    assert_eq!(res.body["adminLocked"], false);
}

#[tokio::test]
async fn test_request_id_and_security_headers() {
    let ctx = TestContext::new();

    let res = ctx.get("/api/settings", None).await;
    let request_id = res.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(request_id.len(), 36);
    assert_eq!(res.headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(res.headers.get("x-content-type-options").unwrap(), "nosniff");

    let res = ctx.request(Method::GET, "/nope", None, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.headers.contains_key("x-request-id"));
}
