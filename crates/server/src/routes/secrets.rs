//! Secret manager endpoints. Owner only.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::middleware::RequireOwner;
use crate::models::FieldErrors;
use crate::services::SecretsManager;
use crate::state::AppState;

const DEFAULT_AUDIT_PER_PAGE: u32 = 20;
const MAX_AUDIT_PER_PAGE: u32 = 100;

fn manager(state: &AppState) -> Result<&dyn SecretsManager, AppError> {
    state
        .secrets()
        .ok_or(AppError::NotConfigured("Secret manager"))
}

/// Take a required, non-blank parameter.
fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            errors.add(field, "is required");
            String::new()
        }
    }
}

/// GET /api/admin/secrets/projects
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn projects(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let projects = manager(&state)?.projects().await?;
    Ok(Json(json!({ "projects": projects })))
}

#[derive(Debug, Deserialize)]
pub struct ConfigsQuery {
    pub project: Option<String>,
}

/// GET /api/admin/secrets/configs?project=
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn configs(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ConfigsQuery>,
) -> Result<Json<Value>, AppError> {
    let manager = manager(&state)?;
    let mut errors = FieldErrors::new();
    let project = required(&mut errors, "project", query.project);
    errors.into_result(())?;

    let configs = manager.configs(&project).await?;
    Ok(Json(json!({ "configs": configs })))
}

#[derive(Debug, Deserialize)]
pub struct SecretsQuery {
    pub project: Option<String>,
    pub config: Option<String>,
}

/// GET /api/admin/secrets?project=&config=
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn list(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SecretsQuery>,
) -> Result<Json<Value>, AppError> {
    let manager = manager(&state)?;
    let mut errors = FieldErrors::new();
    let project = required(&mut errors, "project", query.project);
    let config = required(&mut errors, "config", query.config);
    errors.into_result(())?;

    let secrets = manager.secrets(&project, &config).await?;
    Ok(Json(json!({ "secrets": secrets })))
}

/// `POST /api/admin/secrets` body.
///
/// Either one `name`/`value` pair or a `secrets` map; both may be given.
#[derive(Deserialize)]
pub struct SetSecretsBody {
    pub project: Option<String>,
    pub config: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

/// POST /api/admin/secrets
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn set(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetSecretsBody>,
) -> Result<Json<Value>, AppError> {
    let manager = manager(&state)?;
    let mut errors = FieldErrors::new();
    let project = required(&mut errors, "project", body.project);
    let config = required(&mut errors, "config", body.config);

    let mut secrets = body.secrets;
    if let Some(name) = body.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        secrets.insert(name, body.value.unwrap_or_default());
    }
    if secrets.is_empty() {
        errors.add("name", "is required");
    }
    errors.into_result(())?;

    manager.set_secrets(&project, &config, &secrets).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Secret updated successfully",
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteSecretQuery {
    pub project: Option<String>,
    pub config: Option<String>,
    pub name: Option<String>,
}

/// DELETE /api/admin/secrets?project=&config=&name=
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn delete(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DeleteSecretQuery>,
) -> Result<Json<Value>, AppError> {
    let manager = manager(&state)?;
    let mut errors = FieldErrors::new();
    let project = required(&mut errors, "project", query.project);
    let config = required(&mut errors, "config", query.config);
    let name = required(&mut errors, "name", query.name);
    errors.into_result(())?;

    manager.delete_secret(&project, &config, &name).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Secret deleted successfully",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub project: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/admin/secrets/audit?project=&page=&perPage=
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn audit(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AuditQuery>,
) -> Result<Json<Value>, AppError> {
    let manager = manager(&state)?;
    let mut errors = FieldErrors::new();
    let project = required(&mut errors, "project", query.project);
    errors.into_result(())?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_AUDIT_PER_PAGE)
        .clamp(1, MAX_AUDIT_PER_PAGE);

    let logs = manager.audit_log(&project, page, per_page).await?;
    Ok(Json(json!({ "logs": logs })))
}
