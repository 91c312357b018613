//! Owner tooling: secret manager and deployment platform.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;
use zenzebra_integration_tests::TestContext;

#[tokio::test]
async fn test_secrets_round_trip() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx.get("/api/admin/secrets/projects", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["projects"][0]["name"], "web");

    let res = ctx
        .get("/api/admin/secrets/configs?project=web", Some(&owner))
        .await;
    assert_eq!(res.body["configs"].as_array().unwrap().len(), 2);

    let res = ctx
        .post(
            "/api/admin/secrets",
            Some(&owner),
            json!({"project": "web", "config": "prd", "name": "API_URL", "value": "https://api.zenzebra.in"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Secret updated successfully");
    assert_eq!(
        ctx.secrets.value("web", "prd", "API_URL").as_deref(),
        Some("https://api.zenzebra.in")
    );

    let res = ctx
        .post(
            "/api/admin/secrets",
            Some(&owner),
            json!({"project": "web", "config": "prd", "secrets": {"A": "1", "B": "2"}}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = ctx
        .get("/api/admin/secrets?project=web&config=prd", Some(&owner))
        .await;
    assert_eq!(res.body["secrets"]["A"]["raw"], "1");
    assert_eq!(res.body["secrets"]["API_URL"]["computed"], "https://api.zenzebra.in");

    let res = ctx
        .delete(
            "/api/admin/secrets?project=web&config=prd&name=A",
            Some(&owner),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Secret deleted successfully");
    assert!(ctx.secrets.value("web", "prd", "A").is_none());

    let res = ctx
        .delete(
            "/api/admin/secrets?project=web&config=prd&name=A",
            Some(&owner),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = ctx
        .get("/api/admin/secrets/audit?project=web&page=2&perPage=2", Some(&owner))
        .await;
    let logs = res.body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["id"], "log-2-0");
}

#[tokio::test]
async fn test_secrets_require_parameters() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx.get("/api/admin/secrets?project=web", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["fields"]["config"], "is required");

    let res = ctx
        .post(
            "/api/admin/secrets",
            Some(&owner),
            json!({"project": "web", "config": "prd"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["fields"]["name"], "is required");

    let res = ctx.delete("/api/admin/secrets", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let fields = res.body["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 3);
}

#[tokio::test]
async fn test_deployments_flow() {
    let ctx = TestContext::new();
    let (_, owner) = ctx.owner();

    let res = ctx
        .post("/api/admin/deployments", Some(&owner), json!({}))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["deployment"]["target"], "production");
    let first = res.body["deployment"]["id"].as_str().unwrap().to_string();

    let res = ctx
        .post(
            "/api/admin/deployments",
            Some(&owner),
            json!({"target": "preview"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body["deployment"]["target"].is_null());
    assert_eq!(
        res.body["deployment"]["meta"]["githubCommitRef"],
        "staging"
    );

    let res = ctx
        .post(
            "/api/admin/deployments",
            Some(&owner),
            json!({"target": "staging"}),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["fields"]["target"].is_string());

    let res = ctx.get("/api/admin/deployments?limit=1", Some(&owner)).await;
    let deployments = res.body["deployments"].as_array().unwrap();
    assert_eq!(deployments.len(), 1);

    let res = ctx
        .get(&format!("/api/admin/deployments/{first}"), Some(&owner))
        .await;
    assert_eq!(res.body["deployment"]["state"], "BUILDING");

    let res = ctx
        .delete(&format!("/api/admin/deployments/{first}"), Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Deployment canceled");

    let res = ctx
        .patch(
            &format!("/api/admin/deployments/{first}"),
            Some(&owner),
            json!({}),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Deployment promoted to production");
    assert_eq!(ctx.deployments.all().len(), 3);

    let res = ctx
        .get(&format!("/api/admin/deployments/{first}/logs"), Some(&owner))
        .await;
    assert_eq!(res.body["logs"][0]["text"], "Build started");

    let res = ctx
        .get("/api/admin/deployments/dpl_missing", Some(&owner))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = ctx.get("/api/admin/domains", Some(&owner)).await;
    assert_eq!(res.body["domains"][0]["name"], "zenzebra.in");
}

#[tokio::test]
async fn test_unconfigured_integrations_answer_503() {
    let ctx = TestContext::builder().without_integrations().build();
    let (_, owner) = ctx.owner();

    let res = ctx.get("/api/admin/secrets/projects", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["code"], "not_configured");
    assert_eq!(res.body["error"], "Secret manager is not configured");

    let res = ctx.get("/api/admin/deployments", Some(&owner)).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["error"], "Deployment platform is not configured");

    // Ownership is checked first
    let (_, admin) = ctx.admin("Ravi", "ravi@zenzebra.in");
    let res = ctx.get("/api/admin/domains", Some(&admin)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}
