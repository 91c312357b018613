//! The signed-in admin's own account.

use axum::{Json, extract::State};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;
use zenzebra_core::{AdminPrincipal, SessionGate};

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireSession;
use crate::models::{FieldErrors, check_password};
use crate::state::AppState;

/// `GET /api/admin/me` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub principal: AdminPrincipal,
    pub is_owner: bool,
    pub gate: SessionGate,
}

/// GET /api/admin/me
///
/// Available with a pending gate so the panel can route the admin to the
/// required step.
#[instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn me(
    RequireSession(principal): RequireSession,
    State(state): State<AppState>,
) -> Json<MeResponse> {
    let is_owner = state
        .owner()
        .is_owner(&principal.id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Owner check failed, reporting not owner");
            false
        });

    Json(MeResponse {
        gate: principal.gate(),
        is_owner,
        principal,
    })
}

/// `POST /api/admin/reset-password` body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

/// POST /api/admin/reset-password
///
/// Sets a new password and clears the pending reset flag. Other
/// preferences are left as they were.
#[instrument(skip_all, fields(admin_id = %principal.id))]
pub async fn reset_password(
    RequireSession(principal): RequireSession,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let mut errors = FieldErrors::new();
    check_password(&mut errors, "newPassword", &request.new_password);
    errors.into_result(())?;

    let identity = state.identity();
    identity
        .update_password(&principal.id, &SecretString::from(request.new_password))
        .await?;

    let mut prefs = principal.prefs.clone();
    prefs.must_reset_password = false;
    let prefs = identity.update_prefs(&principal.id, &prefs).await?;
    tracing::info!("Password reset completed");

    let updated = AdminPrincipal {
        prefs,
        ..principal
    };
    Ok(Json(json!({ "success": true, "gate": updated.gate() })))
}
