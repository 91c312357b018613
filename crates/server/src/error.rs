//! Unified error handling for the HTTP API.
//!
//! Every error answers with a JSON body `{error, code}` plus variant-specific
//! fields. Backend details never reach the client; server-side failures are
//! reported to Sentry.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use zenzebra_core::{SessionGate, TransitionError};

use crate::db::RepositoryError;
use crate::models::FieldErrors;
use crate::services::{DopplerError, EmailError, IdentityError, VercelError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document backend operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity backend operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Secret manager operation failed.
    #[error("Secrets error: {0}")]
    Secrets(#[from] DopplerError),

    /// Deployment platform operation failed.
    #[error("Deployment error: {0}")]
    Deployments(#[from] VercelError),

    /// Email could not be built or sent.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Request input failed validation.
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// No valid session.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but not allowed.
    #[error("Forbidden")]
    Forbidden,

    /// The admin kill switch is on.
    #[error("Admin panel disabled")]
    AdminLocked,

    /// The admin has a pending security step.
    #[error("Session gate pending: {0:?}")]
    Gate(SessionGate),

    /// Status change not allowed by the workflow.
    #[error("Invalid status transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// Too many requests from this client.
    #[error("Too many requests, please try again later")]
    RateLimited,

    /// Maintenance mode is on; carries the configured message.
    #[error("{0}")]
    Maintenance(String),

    /// An optional integration is not configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// How an error is presented to the client.
enum Class {
    Validation(FieldErrors),
    Unauthorized,
    Forbidden(&'static str),
    Gate(&'static str, &'static str),
    Conflict(String),
    Transition(TransitionError),
    NotFound,
    RateLimited,
    Unavailable(&'static str, String),
    Upstream,
    Internal,
}

impl AppError {
    /// Validation failure on a single field.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    /// Failures on our side or a collaborator's, as opposed to client errors.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(e) => {
                !matches!(e, RepositoryError::NotFound | RepositoryError::Conflict(_))
            }
            Self::Identity(e) => matches!(e, IdentityError::Backend(_)),
            Self::Secrets(e) => !matches!(e, DopplerError::NotFound(_)),
            Self::Deployments(e) => !matches!(e, VercelError::NotFound(_)),
            Self::Email(_) | Self::Internal(_) => true,
            _ => false,
        }
    }

    fn classify(self) -> Class {
        match self {
            Self::Validation(fields) => Class::Validation(fields),
            Self::Unauthorized | Self::Identity(IdentityError::InvalidSession) => {
                Class::Unauthorized
            }
            Self::Forbidden | Self::Gate(SessionGate::Clear) => Class::Forbidden("Forbidden"),
            Self::AdminLocked => Class::Forbidden("Admin panel disabled"),
            Self::Gate(SessionGate::PasswordResetRequired) => {
                Class::Gate("password_reset_required", "Password reset required")
            }
            Self::Gate(SessionGate::MfaSetupRequired) => {
                Class::Gate("mfa_setup_required", "MFA setup required")
            }
            Self::InvalidTransition(e) => Class::Transition(e),
            Self::NotFound
            | Self::Database(RepositoryError::NotFound)
            | Self::Identity(IdentityError::NotFound)
            | Self::Secrets(DopplerError::NotFound(_))
            | Self::Deployments(VercelError::NotFound(_)) => Class::NotFound,
            Self::Database(RepositoryError::Conflict(_)) => {
                Class::Conflict("Resource already exists".to_string())
            }
            Self::Identity(IdentityError::Conflict(_)) => {
                Class::Conflict("An admin with this email already exists".to_string())
            }
            Self::Identity(IdentityError::Rejected(message)) => {
                Class::Validation(FieldErrors::single("request", message))
            }
            Self::RateLimited => Class::RateLimited,
            Self::Maintenance(message) => Class::Unavailable("maintenance", message),
            Self::NotConfigured(what) => {
                Class::Unavailable("not_configured", format!("{what} is not configured"))
            }
            Self::Database(RepositoryError::Backend(_))
            | Self::Identity(IdentityError::Backend(_))
            | Self::Secrets(_)
            | Self::Deployments(_)
            | Self::Email(_) => Class::Upstream,
            Self::Database(RepositoryError::DataCorruption(_)) | Self::Internal(_) => {
                Class::Internal
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = match self.classify() {
            Class::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Validation failed", "code": "validation", "fields": fields}),
            ),
            Class::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                body("Authentication required", "unauthorized"),
            ),
            Class::Forbidden(message) => (StatusCode::FORBIDDEN, body(message, "forbidden")),
            Class::Gate(code, message) => (StatusCode::FORBIDDEN, body(message, code)),
            Class::Conflict(message) => (StatusCode::CONFLICT, body(&message, "conflict")),
            Class::Transition(e) => (
                StatusCode::CONFLICT,
                json!({
                    "error": format!("Cannot change status from {} to {}", e.from, e.to),
                    "code": "invalid_transition",
                    "from": e.from,
                    "to": e.to,
                }),
            ),
            Class::NotFound => (StatusCode::NOT_FOUND, body("Not found", "not_found")),
            Class::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                body("Too many requests, please try again later", "rate_limited"),
            ),
            Class::Unavailable(code, message) => {
                (StatusCode::SERVICE_UNAVAILABLE, body(&message, code))
            }
            Class::Upstream => (
                StatusCode::BAD_GATEWAY,
                body("External service error", "upstream"),
            ),
            Class::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                body("Internal server error", "internal"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn body(message: &str, code: &str) -> Value {
    json!({"error": message, "code": code})
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::field("query", rejection.body_text())
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Set the Sentry user context from an admin.
pub fn set_sentry_user(admin_id: &str, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}
