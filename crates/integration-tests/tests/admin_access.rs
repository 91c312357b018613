//! Session gates, owner-only operations and the admin lock switch.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::{Value, json};
use secrecy::SecretString;
use zenzebra_core::{AdminPrefs, Email, SessionGate};
use zenzebra_integration_tests::{IdentityCall, MemoryIdentityStore, TestContext};
use zenzebra_server::services::{NewAdmin, provision_admin};

#[tokio::test]
async fn test_me_reports_owner_and_gate() {
    let ctx = TestContext::new();
    let (owner, owner_token) = ctx.owner();
    let (_, admin_token) = ctx.admin("Ravi", "ravi@zenzebra.in");

    let res = ctx.get("/api/admin/me", Some(&owner_token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["isOwner"], true);
    assert_eq!(res.body["gate"], "clear");
    assert_eq!(res.body["principal"]["id"], owner.id.as_str());

    let res = ctx.get("/api/admin/me", Some(&admin_token)).await;
    assert_eq!(res.body["isOwner"], false);
}

#[tokio::test]
async fn test_password_reset_gate() {
    let ctx = TestContext::new();
    ctx.owner();

    let mut prefs = AdminPrefs {
        must_reset_password: true,
        mfa_required: false,
        ..AdminPrefs::default()
    };
    prefs.extra.insert("theme".to_string(), json!("dark"));
    let admin = ctx
        .identity
        .add_admin_with("New", "new@zenzebra.in", prefs, false);
    let token = ctx.identity.session_for(&admin.id);

    let res = ctx.get("/api/admin/inquiries", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], "password_reset_required");

    // The session alone is enough to see the gate
    let res = ctx.get("/api/admin/me", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["gate"], "password_reset_required");

    let res = ctx
        .post(
            "/api/admin/reset-password",
            Some(&token),
            json!({"newPassword": "short"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["fields"]["newPassword"].is_string());

    let res = ctx
        .post(
            "/api/admin/reset-password",
            Some(&token),
            json!({"newPassword": "a much better password"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["gate"], "clear");

    let updated = ctx.identity.principal(&admin.id).unwrap();
    assert!(!updated.prefs.must_reset_password);
    assert_eq!(updated.prefs.extra["theme"], "dark");
    assert_eq!(
        ctx.identity.password(&admin.id).unwrap(),
        "a much better password"
    );

    let res = ctx.get("/api/admin/inquiries", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_mfa_gate_after_reset() {
    let ctx = TestContext::new();
    ctx.owner();

    let admin = ctx.identity.add_admin_with(
        "New",
        "new@zenzebra.in",
        AdminPrefs::for_new_admin(),
        false,
    );
    let token = ctx.identity.session_for(&admin.id);

    ctx.post(
        "/api/admin/reset-password",
        Some(&token),
        json!({"newPassword": "a much better password"}),
    )
    .await;

    let res = ctx.get("/api/admin/inquiries", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], "mfa_setup_required");
}

#[tokio::test]
async fn test_blocked_admin_is_refused() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();
    let (admin, admin_token) = ctx.admin("Ravi", "ravi@zenzebra.in");

    let res = ctx
        .patch(
            &format!("/api/admin/users/{}", admin.id),
            Some(&owner),
            json!({"status": false}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["user"]["active"], false);

    let res = ctx.get("/api/admin/me", Some(&admin_token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = ctx
        .patch(
            &format!("/api/admin/users/{}", admin.id),
            Some(&owner),
            json!({"status": true}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let res = ctx.get("/api/admin/me", Some(&admin_token)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_owner_only_routes_refuse_standard_admins() {
    let ctx = TestContext::new();
    ctx.owner();
    let (_, admin) = ctx.admin("Ravi", "ravi@zenzebra.in");

    for uri in [
        "/api/admin/users",
        "/api/admin/secrets/projects",
        "/api/admin/deployments",
        "/api/admin/domains",
    ] {
        let res = ctx.get(uri, Some(&admin)).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(res.body, json!({"error": "Forbidden", "code": "forbidden"}));
    }

    let res = ctx
        .post("/api/settings", Some(&admin), json!({"siteName": "Hacked"}))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = ctx.get("/api/settings", None).await;
    assert_eq!(res.body["siteName"], "ZenZebra");
}

#[tokio::test]
async fn test_owner_creates_admin() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .post(
            "/api/admin/users",
            Some(&owner),
            json!({
                "name": "Ravi Kumar",
                "email": "ravi@zenzebra.in",
                "password": "temporary-pass-1",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user"]["email"], "ravi@zenzebra.in");
    assert_eq!(res.body["user"]["prefs"]["mustResetPassword"], true);
    assert_eq!(res.body["user"]["prefs"]["mfaRequired"], true);

    let created = ctx.identity.find_by_email("ravi@zenzebra.in").unwrap();
    assert!(ctx.identity.email_verified(&created.id));
    assert!(created.prefs.must_reset_password);

    let sent = ctx.mailer.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ravi@zenzebra.in");
    assert_eq!(sent[0].subject, "Welcome to the ZenZebra admin panel");
    assert!(sent[0].text.contains("https://zenzebra.in/admin/login"));
    assert!(!sent[0].text.contains("temporary-pass-1"));
    assert!(!sent[0].html.contains("temporary-pass-1"));

    // Newest first, owner last
    let res = ctx.get("/api/admin/users", Some(&owner)).await;
    let users = res.body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "ravi@zenzebra.in");
    assert_eq!(users[0]["isOwner"], false);
    assert_eq!(users[1]["isOwner"], true);
}

#[tokio::test]
async fn test_create_admin_validation_and_conflict() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .post(
            "/api/admin/users",
            Some(&owner),
            json!({"name": "", "email": "nope", "password": "short"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let fields = &res.body["fields"];
    assert!(fields["name"].is_string());
    assert!(fields["email"].is_string());
    assert_eq!(fields["password"], "must be at least 8 characters");

    let res = ctx
        .post(
            "/api/admin/users",
            Some(&owner),
            json!({"name": "Dup", "email": "owner@zenzebra.in", "password": "long-enough"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(ctx.identity.count(), 1);
}

#[tokio::test]
async fn test_failed_admin_setup_leaves_no_account() {
    for call in [IdentityCall::UpdatePrefs, IdentityCall::MarkEmailVerified] {
        let ctx = TestContext::new();
        let (_, owner) = ctx.owner();
        ctx.identity.fail_on(call);

        let res = ctx
            .post(
                "/api/admin/users",
                Some(&owner),
                json!({
                    "name": "Ravi Kumar",
                    "email": "ravi@zenzebra.in",
                    "password": "temporary-pass-1",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_GATEWAY, "{call:?}");
        assert!(ctx.identity.find_by_email("ravi@zenzebra.in").is_none(), "{call:?}");
        assert_eq!(ctx.identity.count(), 1);

        let res = ctx.get("/api/admin/users", Some(&owner)).await;
        assert_eq!(res.body["users"].as_array().unwrap().len(), 1);
        assert!(ctx.mailer.settle().await.is_empty());
    }
}

#[tokio::test]
async fn test_provisioned_admin_is_flagged_and_verified() {
    let identity = MemoryIdentityStore::new();
    let new_admin = NewAdmin {
        name: "First Owner".to_string(),
        email: Email::parse("first@zenzebra.in").unwrap(),
        password: SecretString::from("owner-chosen-pass"),
    };

    let principal = provision_admin(&identity, &new_admin).await.unwrap();
    assert_eq!(principal.prefs, AdminPrefs::for_new_admin());
    assert_eq!(principal.gate(), SessionGate::PasswordResetRequired);

    let stored = identity.principal(&principal.id).unwrap();
    assert!(stored.prefs.must_reset_password);
    assert!(stored.prefs.mfa_required);
    assert!(identity.email_verified(&principal.id));
}

#[tokio::test]
async fn test_owner_cannot_be_deleted_or_blocked() {
    let ctx = TestContext::new();
    let (owner, owner_token) = ctx.owner();

    let res = ctx
        .delete(&format!("/api/admin/users/{}", owner.id), Some(&owner_token))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = ctx
        .patch(
            &format!("/api/admin/users/{}", owner.id),
            Some(&owner_token),
            json!({"status": false}),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert!(ctx.identity.principal(&owner.id).unwrap().active);
}

#[tokio::test]
async fn test_owner_deletes_admin() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();
    let (admin, admin_token) = ctx.admin("Ravi", "ravi@zenzebra.in");

    let res = ctx
        .delete(&format!("/api/admin/users/{}", admin.id), Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert!(ctx.identity.principal(&admin.id).is_none());

    let res = ctx.get("/api/admin/me", Some(&admin_token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = ctx
        .delete(&format!("/api/admin/users/{}", admin.id), Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_patch_requires_bool() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();
    let (admin, _) = ctx.admin("Ravi", "ravi@zenzebra.in");

    let res = ctx
        .patch(&format!("/api/admin/users/{}", admin.id), Some(&owner), json!({}))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["fields"]["status"], "is required");
}

#[tokio::test]
async fn test_admin_lock_keeps_settings_reachable() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .update_settings(&owner, json!({"adminLocked": true}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["adminLocked"], true);

    for uri in ["/api/admin/me", "/api/admin/inquiries", "/api/admin/users"] {
        let res = ctx.get(uri, Some(&owner)).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(res.body["error"], "Admin panel disabled");
    }

    // Public forms are unaffected
    let res = ctx
        .post(
            "/api/contact",
            None,
            zenzebra_integration_tests::contact_form("Asha", "asha@example.in"),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = ctx
        .update_settings(&owner, json!({"adminLocked": false}))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let res = ctx.get("/api/admin/me", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_settings_update_ignores_unknown_keys() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .update_settings(
            &owner,
            json!({"siteName": "Zen Store", "favouriteColour": "teal", "supportPhone": 12345}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["siteName"], "Zen Store");
    assert_eq!(res.body["supportPhone"], "12345");
    assert!(res.body.get("favouriteColour").is_none());

    let stored: Vec<Value> = ctx
        .documents
        .documents("settings")
        .into_iter()
        .map(|d| d.data["key"].clone())
        .collect();
    assert!(stored.contains(&json!("siteName")));
    assert!(!stored.contains(&json!("favouriteColour")));

    let res = ctx.get("/api/settings", None).await;
    assert_eq!(res.body["siteName"], "Zen Store");
}
