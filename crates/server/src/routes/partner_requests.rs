//! Admin partner request management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::instrument;
use zenzebra_core::{PartnerRequestId, PartnerRequestStatus, StatusWorkflow};

use super::inquiries::{ListParams, StatusUpdate};
use super::{ApiJson, ApiQuery};
use crate::db::PartnerRequestRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

fn repository(state: &AppState) -> PartnerRequestRepository<'_> {
    PartnerRequestRepository::new(
        state.documents(),
        &state.config().appwrite.partner_requests_collection_id,
    )
}

/// GET /api/admin/partner-requests?limit&offset
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Value>, AppError> {
    let (limit, offset) = params.bounds();

    let (requests, total) = repository(&state).list(limit, offset).await?;
    Ok(Json(json!({ "requests": requests, "total": total })))
}

/// PATCH /api/admin/partner-requests/{id}
///
/// Only the move to `onboarded` emails the partner.
#[instrument(skip_all, fields(admin_id = %admin.id, request_id = %id, status = %update.status))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Value>, AppError> {
    let requested: PartnerRequestStatus = update
        .status
        .parse()
        .map_err(|_| AppError::field("status", "is not a valid partner request status"))?;

    let repo = repository(&state);
    let id = PartnerRequestId::new(id);
    let current = repo.get(&id).await?;
    current.status.transition(requested)?;

    let request = repo.set_status(&id, requested).await?;
    tracing::info!(from = %current.status, to = %requested, "Partner request status changed");

    if requested == PartnerRequestStatus::Onboarded {
        let settings = state.settings().current().await;
        state.notifier().partner_onboarded(&settings, &request);
    }

    Ok(Json(json!({ "request": request })))
}
