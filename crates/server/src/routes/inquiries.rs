//! Admin inquiry management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;
use zenzebra_core::{InquiryId, InquiryStatus, StatusWorkflow};

use super::{ApiJson, ApiQuery};
use crate::db::InquiryRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `PATCH` body for status changes.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 500;

/// Paging for admin listings.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListParams {
    /// `(limit, offset)` with the limit clamped to `1..=500`, default 100.
    #[must_use]
    pub fn bounds(&self) -> (u32, u32) {
        (
            self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

fn repository(state: &AppState) -> InquiryRepository<'_> {
    InquiryRepository::new(
        state.documents(),
        &state.config().appwrite.inquiries_collection_id,
    )
}

/// GET /api/admin/inquiries?limit&offset
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Value>, AppError> {
    let (limit, offset) = params.bounds();
    let (inquiries, total) = repository(&state).list(limit, offset).await?;
    Ok(Json(json!({ "inquiries": inquiries, "total": total })))
}

/// PATCH /api/admin/inquiries/{id}
///
/// Moves the inquiry along the workflow and emails the customer.
#[instrument(skip_all, fields(admin_id = %admin.id, inquiry_id = %id, status = %update.status))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<Value>, AppError> {
    let requested: InquiryStatus = update
        .status
        .parse()
        .map_err(|_| AppError::field("status", "is not a valid inquiry status"))?;

    let repo = repository(&state);
    let id = InquiryId::new(id);
    let current = repo.get(&id).await?;
    current.status.transition(requested)?;

    let inquiry = repo.set_status(&id, requested).await?;
    tracing::info!(from = %current.status, to = %requested, "Inquiry status changed");

    let settings = state.settings().current().await;
    state.notifier().inquiry_status_changed(&settings, &inquiry);

    Ok(Json(json!({ "inquiry": inquiry })))
}

/// DELETE /api/admin/inquiries/{id}
///
/// Inquiries are never deleted; discard them instead.
pub async fn delete() -> AppError {
    AppError::Forbidden
}
