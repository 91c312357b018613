//! Authentication extractors for the admin API.
//!
//! Sessions are bearer tokens (`Authorization: Bearer <jwt>`) issued by the
//! identity backend. Three levels:
//!
//! - [`RequireSession`]: a valid session on an active account
//! - [`RequireAdmin`]: a session with no pending password reset or MFA setup
//! - [`RequireOwner`]: an admin who is also the owner
//!
//! # Example
//!
//! ```rust,ignore
//! async fn handler(RequireOwner(owner): RequireOwner) -> impl IntoResponse {
//!     format!("Hello, {}!", owner.name)
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use zenzebra_core::{AdminPrincipal, SessionGate};

use crate::error::{AppError, set_sentry_user};
use crate::services::IdentityError;
use crate::state::AppState;

/// Bearer token from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extractor that requires a valid session on an active account.
pub struct RequireSession(pub AdminPrincipal);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;

        let principal = state
            .identity()
            .principal_for_session(token)
            .await
            .map_err(|e| match e {
                IdentityError::InvalidSession | IdentityError::NotFound => AppError::Unauthorized,
                other => AppError::Identity(other),
            })?;

        if !principal.active {
            tracing::warn!(admin_id = %principal.id, "Blocked admin attempted access");
            return Err(AppError::Forbidden);
        }

        set_sentry_user(principal.id.as_str(), &principal.email);
        tracing::Span::current().record("admin_id", principal.id.as_str());

        Ok(Self(principal))
    }
}

/// Extractor that requires a session with every security step completed.
pub struct RequireAdmin(pub AdminPrincipal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireSession(principal) = RequireSession::from_request_parts(parts, state).await?;

        match principal.gate() {
            SessionGate::Clear => Ok(Self(principal)),
            gate => Err(AppError::Gate(gate)),
        }
    }
}

/// Extractor that requires the owner.
///
/// Fails closed: if ownership cannot be resolved the request is refused.
pub struct RequireOwner(pub AdminPrincipal);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdmin(principal) = RequireAdmin::from_request_parts(parts, state).await?;

        match state.owner().is_owner(&principal.id).await {
            Ok(true) => Ok(Self(principal)),
            Ok(false) => Err(AppError::Forbidden),
            Err(e) => {
                tracing::warn!(error = %e, admin_id = %principal.id, "Owner check failed");
                Err(AppError::Forbidden)
            }
        }
    }
}
