//! Owner-only admin account management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;
use zenzebra_core::{AdminId, AdminPrincipal};

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireOwner;
use crate::models::CreateAdminForm;
use crate::services::provision_admin;
use crate::state::AppState;

/// One row of the admin listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListItem {
    #[serde(flatten)]
    pub principal: AdminPrincipal,
    pub is_owner: bool,
}

/// GET /api/admin/users
///
/// Newest first; the owner is therefore last.
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn list(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let resolver = state.owner().resolver().await?;
    let owner_id = resolver.owner().map(|p| p.id.clone());

    let users: Vec<AdminListItem> = resolver
        .into_ordered()
        .into_iter()
        .rev()
        .map(|principal| AdminListItem {
            is_owner: owner_id.as_ref() == Some(&principal.id),
            principal,
        })
        .collect();

    Ok(Json(json!({ "users": users })))
}

/// POST /api/admin/users
///
/// Creates the account with a verified email, requires a password reset and
/// MFA setup on first sign-in, and sends a welcome email.
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn create(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<CreateAdminForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new_admin = form.validate()?;

    let provisioned = provision_admin(state.identity(), &new_admin).await;
    state.owner().invalidate().await;
    let user = provisioned?;
    tracing::info!(new_admin_id = %user.id, "Admin created");

    let settings = state.settings().current().await;
    state.notifier().admin_welcome(
        &settings,
        &user.email,
        &user.name,
        &state.config().admin_login_url(),
    );

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// Refuse changes aimed at the owner. Fails closed.
async fn ensure_not_owner(state: &AppState, id: &AdminId) -> Result<(), AppError> {
    if state.owner().is_owner(id).await? {
        tracing::warn!(target_id = %id, "Refusing to modify the owner account");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// DELETE /api/admin/users/{id}
#[instrument(skip_all, fields(admin_id = %owner.id, target_id = %id))]
pub async fn delete(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = AdminId::new(id);
    ensure_not_owner(&state, &id).await?;

    state.identity().delete_principal(&id).await?;
    state.owner().invalidate().await;
    tracing::info!("Admin deleted");

    Ok(Json(json!({ "success": true })))
}

/// `PATCH /api/admin/users/{id}` body.
#[derive(Debug, Deserialize)]
pub struct AccountStatusUpdate {
    pub status: Option<bool>,
}

/// PATCH /api/admin/users/{id}
///
/// `{"status": false}` blocks the account, `true` unblocks it.
#[instrument(skip_all, fields(admin_id = %owner.id, target_id = %id))]
pub async fn set_status(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<AccountStatusUpdate>,
) -> Result<Json<Value>, AppError> {
    let active = update
        .status
        .ok_or_else(|| AppError::field("status", "is required"))?;
    let id = AdminId::new(id);
    ensure_not_owner(&state, &id).await?;

    let user = state.identity().set_active(&id, active).await?;
    tracing::info!(active, "Admin status changed");

    Ok(Json(json!({ "user": user })))
}
