//! Public contact form.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use super::ApiJson;
use crate::db::InquiryRepository;
use crate::error::AppError;
use crate::middleware::{FormRateLimit, FormsOpen};
use crate::models::ContactForm;
use crate::state::AppState;

/// Response for a stored submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub id: String,
    pub status: &'static str,
}

/// Submit a contact form inquiry.
///
/// POST /api/contact
///
/// Stores the inquiry as `Queued` and sends the confirmation email in the
/// background.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    _open: FormsOpen,
    _limit: FormRateLimit,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let new_inquiry = form.validate()?;

    let repo = InquiryRepository::new(
        state.documents(),
        &state.config().appwrite.inquiries_collection_id,
    );
    let inquiry = repo.create(new_inquiry).await?;
    tracing::info!(inquiry_id = %inquiry.id, "Inquiry submitted");

    let settings = state.settings().current().await;
    state.notifier().inquiry_received(&settings, &inquiry);

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            id: inquiry.id.to_string(),
            status: inquiry.status.as_str(),
        }),
    ))
}
