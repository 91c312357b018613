//! Admin partner request workflow.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;
use zenzebra_integration_tests::{TestContext, partner_form};

async fn submit(ctx: &TestContext, company: &str) -> String {
    let res = ctx
        .post(
            "/api/partner-request",
            None,
            partner_form(company, "meera@kala.in"),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_onboarding_emails_only_at_the_end() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.owner();
    let id = submit(&ctx, "Kala Studio").await;
    ctx.mailer.wait_for(1).await;

    for status in ["contacted", "in_progress"] {
        let res = ctx
            .patch(
                &format!("/api/admin/partner-requests/{id}"),
                Some(&admin),
                json!({ "status": status }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["request"]["status"], status);
    }
    assert_eq!(ctx.mailer.settle().await.len(), 1);

    let res = ctx
        .patch(
            &format!("/api/admin/partner-requests/{id}"),
            Some(&admin),
            json!({"status": "onboarded"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let sent = ctx.mailer.wait_for(2).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].subject, "ZenZebra - Partner Request Onboarded");
    assert!(sent[1].text.contains("shifted to onboarded"));
    assert!(sent[1].text.contains("Kala Studio"));
}

#[tokio::test]
async fn test_forward_only() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.owner();
    let id = submit(&ctx, "Kala Studio").await;

    let res = ctx
        .patch(
            &format!("/api/admin/partner-requests/{id}"),
            Some(&admin),
            json!({"status": "onboarded"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["from"], "Queued");
    assert_eq!(res.body["to"], "onboarded");

    let res = ctx
        .patch(
            &format!("/api/admin/partner-requests/{id}"),
            Some(&admin),
            json!({"status": "spam"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = ctx
        .patch(
            &format!("/api/admin/partner-requests/{id}"),
            Some(&admin),
            json!({"status": "contacted"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_pages_newest_first() {
    let ctx = TestContext::new();
    let (_, admin) = ctx.owner();
    let a = submit(&ctx, "A").await;
    let b = submit(&ctx, "B").await;
    let c = submit(&ctx, "C").await;

    let res = ctx.get("/api/admin/partner-requests", Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["total"], 3);
    let ids: Vec<&str> = res.body["requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [c.as_str(), b.as_str(), a.as_str()]);

    let res = ctx
        .get("/api/admin/partner-requests?limit=1&offset=1", Some(&admin))
        .await;
    assert_eq!(res.body["total"], 3);
    let requests = res.body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["id"], b.as_str());
    assert_eq!(requests[0]["companyName"], "B");

    let res = ctx
        .get("/api/admin/partner-requests?limit=lots", Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["fields"]["query"].is_string());
}
