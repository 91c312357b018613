//! Deployment platform endpoints. Owner only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::middleware::RequireOwner;
use crate::services::DeploymentPlatform;
use crate::services::vercel::DeploymentTarget;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

fn platform(state: &AppState) -> Result<&dyn DeploymentPlatform, AppError> {
    state
        .deployments()
        .ok_or(AppError::NotConfigured("Deployment platform"))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

/// GET /api/admin/deployments?limit=
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn list(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Value>, AppError> {
    let platform = platform(&state)?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let deployments = platform.list_deployments(limit).await?;
    Ok(Json(json!({ "deployments": deployments })))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
    pub target: Option<String>,
}

/// POST /api/admin/deployments
///
/// Target defaults to production.
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn create(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let platform = platform(&state)?;
    let target = match body.target.as_deref() {
        None => DeploymentTarget::Production,
        Some(raw) => raw
            .parse::<DeploymentTarget>()
            .map_err(|e| AppError::field("target", e))?,
    };

    let deployment = platform.create_deployment(target).await?;
    Ok((StatusCode::CREATED, Json(json!({ "deployment": deployment }))))
}

/// GET /api/admin/deployments/{id}
#[instrument(skip_all, fields(admin_id = %owner.id, deployment_id = %id))]
pub async fn show(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deployment = platform(&state)?.deployment(&id).await?;
    Ok(Json(json!({ "deployment": deployment })))
}

/// DELETE /api/admin/deployments/{id}
///
/// Cancels a build in progress.
#[instrument(skip_all, fields(admin_id = %owner.id, deployment_id = %id))]
pub async fn cancel(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    platform(&state)?.cancel_deployment(&id).await?;
    Ok(Json(json!({ "success": true, "message": "Deployment canceled" })))
}

/// PATCH /api/admin/deployments/{id}
///
/// Redeploys the deployment's source to production.
#[instrument(skip_all, fields(admin_id = %owner.id, deployment_id = %id))]
pub async fn promote(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deployment = platform(&state)?.promote_deployment(&id).await?;
    Ok(Json(json!({
        "deployment": deployment,
        "message": "Deployment promoted to production",
    })))
}

/// GET /api/admin/deployments/{id}/logs
#[instrument(skip_all, fields(admin_id = %owner.id, deployment_id = %id))]
pub async fn logs(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let logs = platform(&state)?.deployment_events(&id).await?;
    Ok(Json(json!({ "logs": logs })))
}

/// GET /api/admin/domains
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn domains(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let domains = platform(&state)?.domains().await?;
    Ok(Json(json!({ "domains": domains })))
}
