//! Kill switches driven by system settings.
//!
//! - `adminLocked`: [`admin_lock_middleware`] refuses every admin route.
//! - `maintenanceMode`: the [`FormsOpen`] extractor refuses public form
//!   submissions with the configured maintenance message.
//!
//! Settings reads never fail (defaults apply), so neither switch can block
//! traffic because the backend is unreachable.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Refuse the request while the admin panel is locked.
pub async fn admin_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.settings().current().await.admin_locked {
        tracing::info!(path = %request.uri().path(), "Admin panel locked, refusing request");
        return AppError::AdminLocked.into_response();
    }
    next.run(request).await
}

/// Extractor that succeeds only while maintenance mode is off.
pub struct FormsOpen;

impl FromRequestParts<AppState> for FormsOpen {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let settings = state.settings().current().await;
        if settings.maintenance_mode {
            return Err(AppError::Maintenance(settings.maintenance_message.clone()));
        }
        Ok(Self)
    }
}
