//! Admin inquiry workflow, end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;
use zenzebra_integration_tests::{TestContext, contact_form};

async fn submit(ctx: &TestContext, name: &str, email: &str) -> String {
    let res = ctx.post("/api/contact", None, contact_form(name, email)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_inquiry_lifecycle() {
    let ctx = TestContext::new();
    let (_, _owner) = ctx.owner();
    let (_, admin) = ctx.admin("Ravi", "ravi@zenzebra.in");

    let id = submit(&ctx, "Asha Rao", "asha@example.in").await;
    ctx.mailer.wait_for(1).await;

    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&admin),
            json!({"status": "In_process"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["inquiry"]["status"], "In_process");

    let sent = ctx.mailer.wait_for(2).await;
    assert_eq!(sent[1].to, "asha@example.in");
    assert_eq!(sent[1].subject, "ZenZebra - Inquiry Update: In process");
    assert!(sent[1].text.contains("updated to: In process"));

    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&admin),
            json!({"status": "In_process"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "invalid_transition");
    assert_eq!(res.body["from"], "In_process");
    assert_eq!(res.body["to"], "In_process");

    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&admin),
            json!({"status": "Completed"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["inquiry"]["status"], "Completed");

    // Completed is terminal
    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&admin),
            json!({"status": "Discarded"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "invalid_transition");
    assert_eq!(res.body["from"], "Completed");
    assert_eq!(res.body["to"], "Discarded");

    let stored = ctx.documents.documents("inquiries");
    assert_eq!(stored[0].data["status"], "Completed");
    assert_eq!(ctx.mailer.settle().await.len(), 3);
}

#[tokio::test]
async fn test_inquiries_list_newest_first() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let first = submit(&ctx, "First", "first@example.in").await;
    let second = submit(&ctx, "Second", "second@example.in").await;

    let res = ctx.get("/api/admin/inquiries", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::OK);
    let inquiries = res.body["inquiries"].as_array().unwrap();
    assert_eq!(inquiries.len(), 2);
    assert_eq!(inquiries[0]["id"], second.as_str());
    assert_eq!(inquiries[1]["id"], first.as_str());
    assert_eq!(inquiries[0]["phone"], 9_876_543_210_u64);
    assert!(inquiries[0]["createdAt"].is_string());
    assert_eq!(res.body["total"], 2);
}

#[tokio::test]
async fn test_inquiries_list_pages_with_total() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let first = submit(&ctx, "First", "first@example.in").await;
    submit(&ctx, "Second", "second@example.in").await;
    let third = submit(&ctx, "Third", "third@example.in").await;

    let res = ctx
        .get("/api/admin/inquiries?limit=1&offset=0", Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["total"], 3);
    let page = res.body["inquiries"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], third.as_str());

    let res = ctx
        .get("/api/admin/inquiries?limit=2&offset=2", Some(&owner))
        .await;
    let page = res.body["inquiries"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], first.as_str());
    assert_eq!(res.body["total"], 3);

    let res = ctx
        .get("/api/admin/inquiries?offset=-1", Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["fields"]["query"].is_string());
}

#[tokio::test]
async fn test_skipping_ahead_is_rejected() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();
    let id = submit(&ctx, "Asha", "asha@example.in").await;

    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&owner),
            json!({"status": "Completed"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["from"], "Queued");

    // Discarding straight from the queue is allowed
    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&owner),
            json!({"status": "Discarded"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_status_and_missing_inquiry() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();
    let id = submit(&ctx, "Asha", "asha@example.in").await;

    let res = ctx
        .patch(
            &format!("/api/admin/inquiries/{id}"),
            Some(&owner),
            json!({"status": "Archived"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["fields"]["status"].is_string());

    let res = ctx
        .patch(
            "/api/admin/inquiries/does-not-exist",
            Some(&owner),
            json!({"status": "In_process"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inquiries_cannot_be_deleted() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();
    let id = submit(&ctx, "Asha", "asha@example.in").await;

    let res = ctx
        .delete(&format!("/api/admin/inquiries/{id}"), Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = ctx.delete(&format!("/api/admin/inquiries/{id}"), None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    assert_eq!(ctx.documents.documents("inquiries").len(), 1);
}

#[tokio::test]
async fn test_inquiries_require_session() {
    let ctx = TestContext::new();
    ctx.owner();

    let res = ctx.get("/api/admin/inquiries", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "unauthorized");

    let res = ctx.get("/api/admin/inquiries", Some("forged-token")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_backend_outage_is_upstream_error() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    ctx.documents.set_offline(true);
    let res = ctx.get("/api/admin/inquiries", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.body["error"], "External service error");
    assert!(!res.body.to_string().contains("offline"));
}
