//! Site settings.

use axum::{Json, extract::State};
use serde_json::{Map, Value};
use tracing::instrument;
use zenzebra_core::SystemSettings;

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireOwner;
use crate::state::AppState;

/// GET /api/settings
///
/// Public; the site reads its flags and copy from here.
pub async fn show(State(state): State<AppState>) -> Json<SystemSettings> {
    Json(state.settings().current().await.as_ref().clone())
}

/// POST /api/settings
///
/// Partial update. Takes effect on the next request.
#[instrument(skip_all, fields(admin_id = %owner.id))]
pub async fn update(
    RequireOwner(owner): RequireOwner,
    State(state): State<AppState>,
    ApiJson(changes): ApiJson<Map<String, Value>>,
) -> Result<Json<SystemSettings>, AppError> {
    let settings = state.settings().update(&changes).await?;
    Ok(Json(settings))
}
