//! Public partner request form.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use super::ApiJson;
use super::contact::SubmissionResponse;
use crate::db::PartnerRequestRepository;
use crate::error::AppError;
use crate::middleware::{FormRateLimit, FormsOpen};
use crate::models::PartnerRequestForm;
use crate::state::AppState;

/// Submit a partnership request.
///
/// POST /api/partner-request
#[instrument(skip_all, fields(email = %form.email, company = %form.company_name))]
pub async fn submit(
    State(state): State<AppState>,
    _open: FormsOpen,
    _limit: FormRateLimit,
    ApiJson(form): ApiJson<PartnerRequestForm>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let new_request = form.validate()?;

    let repo = PartnerRequestRepository::new(
        state.documents(),
        &state.config().appwrite.partner_requests_collection_id,
    );
    let request = repo.create(new_request).await?;
    tracing::info!(request_id = %request.id, "Partner request submitted");

    let settings = state.settings().current().await;
    state.notifier().partner_request_received(&settings, &request);

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            id: request.id.to_string(),
            status: request.status.as_str(),
        }),
    ))
}
