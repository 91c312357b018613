//! Public form submissions: validation, confirmation emails, kill switch and
//! rate limiting.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use zenzebra_integration_tests::{FailingMailer, TestContext, contact_form, partner_form};

#[tokio::test]
async fn test_contact_submission_is_queued_and_confirmed() {
    let ctx = TestContext::new();

    let res = ctx
        .post("/api/contact", None, contact_form("Asha Rao", "asha@example.in"))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["status"], "Queued");

    let stored = ctx.documents.documents("inquiries");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, res.body["id"].as_str().unwrap());
    assert_eq!(stored[0].data["status"], "Queued");
    assert_eq!(stored[0].data["phone"], 9_876_543_210_u64);

    let sent = ctx.mailer.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@example.in");
    assert_eq!(sent[0].subject, "ZenZebra - Inquiry Received: Asha Rao");
    assert!(sent[0].text.contains("Hello Asha Rao"));
    assert!(sent[0].text.contains("Do you ship to Pune?"));
}

#[tokio::test]
async fn test_contact_validation_reports_every_field() {
    let ctx = TestContext::new();

    let res = ctx
        .post(
            "/api/contact",
            None,
            json!({"name": " ", "email": "not-an-email", "phone": "12345", "query": ""}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "validation");
    let fields = res.body["fields"].as_object().unwrap();
    for field in ["name", "email", "phone", "query"] {
        assert!(fields.contains_key(field), "missing error for {field}");
    }

    assert!(ctx.documents.documents("inquiries").is_empty());
    assert!(ctx.mailer.settle().await.is_empty());
}

#[tokio::test]
async fn test_phone_accepts_separators_and_numbers() {
    let ctx = TestContext::new();

    let mut form = contact_form("Ravi", "ravi@example.in");
    form["phone"] = json!("(987) 654-3210");
    let res = ctx.post("/api/contact", None, form).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let mut form = contact_form("Ravi", "ravi@example.in");
    form["phone"] = json!(9_876_543_210_u64);
    let res = ctx.post("/api/contact", None, form).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let mut form = contact_form("Ravi", "ravi@example.in");
    form["phone"] = json!("98765 43210 1");
    let res = ctx.post("/api/contact", None, form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["fields"]["phone"].is_string());
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let ctx = TestContext::new();

    let res = ctx
        .request(
            axum::http::Method::POST,
            "/api/contact",
            None,
            Some(json!(["not", "an", "object"])),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "validation");
    assert!(res.body["fields"]["body"].is_string());
}

#[tokio::test]
async fn test_partner_request_is_queued_and_confirmed() {
    let ctx = TestContext::new();

    let res = ctx
        .post(
            "/api/partner-request",
            None,
            partner_form("Kala Studio", "meera@kala.in"),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["status"], "Queued");

    let stored = ctx.documents.documents("partner_requests");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].data["companyName"], "Kala Studio");

    let sent = ctx.mailer.wait_for(1).await;
    assert_eq!(sent[0].to, "meera@kala.in");
    assert_eq!(sent[0].subject, "ZenZebra - Partner Request Submitted");
    assert!(sent[0].text.contains("Kala Studio"));
}

#[tokio::test]
async fn test_partner_request_requires_company() {
    let ctx = TestContext::new();

    let mut form = partner_form("", "meera@kala.in");
    form.as_object_mut().unwrap().remove("companyWebsite");
    let res = ctx.post("/api/partner-request", None, form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["fields"]["companyName"], "is required");
    assert!(res.body["fields"].get("companyWebsite").is_none());
}

#[tokio::test]
async fn test_maintenance_mode_refuses_forms() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .update_settings(
            &owner,
            json!({"maintenanceMode": true, "maintenanceMessage": "Back at noon"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["maintenanceMode"], true);

    let res = ctx
        .post("/api/contact", None, contact_form("Asha", "asha@example.in"))
        .await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["code"], "maintenance");
    assert_eq!(res.body["error"], "Back at noon");

    let res = ctx
        .post("/api/partner-request", None, partner_form("Kala", "m@kala.in"))
        .await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);

    assert!(ctx.documents.documents("inquiries").is_empty());

    // Reads stay available
    let res = ctx.get("/api/settings", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["maintenanceMessage"], "Back at noon");
}

#[tokio::test]
async fn test_form_rate_limit_per_client_ip() {
    let ctx = TestContext::builder()
        .config(|c| c.form_rate_limit_per_hour = NonZeroU32::new(2).unwrap())
        .build();

    for _ in 0..2 {
        let res = ctx
            .post("/api/contact", None, contact_form("Asha", "asha@example.in"))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let res = ctx
        .post("/api/partner-request", None, partner_form("Kala", "m@kala.in"))
        .await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["code"], "rate_limited");
    assert_eq!(ctx.documents.documents("inquiries").len(), 2);
    assert!(ctx.documents.documents("partner_requests").is_empty());
}

#[tokio::test]
async fn test_email_failure_does_not_fail_submission() {
    let mailer = Arc::new(FailingMailer::default());
    let ctx = TestContext::builder().mailer(mailer.clone()).build();

    let res = ctx
        .post("/api/contact", None, contact_form("Asha", "asha@example.in"))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(ctx.documents.documents("inquiries").len(), 1);

    for _ in 0..100 {
        if mailer.attempts() > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(mailer.attempts(), 1);
}

#[tokio::test]
async fn test_notifications_switch_silences_email() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .update_settings(&owner, json!({"emailNotificationsEnabled": false}))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = ctx
        .post("/api/contact", None, contact_form("Asha", "asha@example.in"))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(ctx.mailer.settle().await.is_empty());
}

#[tokio::test]
async fn test_custom_confirmation_template() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    ctx.update_settings(
        &owner,
        json!({
            "inquiryConfirmationSubject": "Thanks {name}",
            "inquiryConfirmationTemplate": "We got: {query}",
        }),
    )
    .await;

    ctx.post("/api/contact", None, contact_form("Asha", "asha@example.in"))
        .await;
    let sent = ctx.mailer.wait_for(1).await;
    assert_eq!(sent[0].subject, "Thanks Asha");
    assert!(sent[0].text.starts_with("We got: Do you ship to Pune?"));
}
