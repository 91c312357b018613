//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Readiness (document backend)
//!
//! # Public forms (maintenance switch + per-IP limit)
//! POST   /api/contact                     - Submit an inquiry
//! POST   /api/partner-request             - Submit a partner request
//!
//! # Settings
//! GET    /api/settings                    - Current settings (public)
//! POST   /api/settings                    - Partial update (owner)
//!
//! # Admin (/api/admin, admin lock switch)
//! GET    /me                              - Principal, owner flag, gate (session)
//! POST   /reset-password                  - Clear the reset gate (session)
//! GET    /inquiries                       - List inquiries
//! PATCH  /inquiries/{id}                  - Change status
//! DELETE /inquiries/{id}                  - Always refused
//! GET    /partner-requests                - List partner requests
//! PATCH  /partner-requests/{id}           - Change status
//!
//! # Owner only
//! GET    /users                           - List admins
//! POST   /users                           - Create an admin
//! PATCH  /users/{id}                      - Block or unblock
//! DELETE /users/{id}                      - Delete
//! GET    /secrets/projects                - Secret manager projects
//! GET    /secrets/configs                 - Configs of a project
//! GET    /secrets                         - Secrets of a config
//! POST   /secrets                         - Set secrets
//! DELETE /secrets                         - Delete a secret
//! GET    /secrets/audit                   - Audit log
//! GET    /deployments                     - Recent deployments
//! POST   /deployments                     - Deploy
//! GET    /deployments/{id}                - Deployment detail
//! PATCH  /deployments/{id}                - Promote to production
//! DELETE /deployments/{id}                - Cancel
//! GET    /deployments/{id}/logs           - Build events
//! GET    /domains                         - Project domains
//! ```

pub mod account;
pub mod contact;
pub mod deployments;
pub mod health;
pub mod inquiries;
pub mod partner_request;
pub mod partner_requests;
pub mod secrets;
pub mod settings;
pub mod users;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, Request},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;
use crate::middleware::admin_lock_middleware;
use crate::state::AppState;

/// JSON object body extractor whose rejections use the API error shape.
///
/// Only objects are accepted. Serde would otherwise bind a JSON array to a
/// struct positionally.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<Value>::from_request(req, state).await?;
        if !value.is_object() {
            return Err(AppError::field("body", "must be a JSON object"));
        }
        serde_json::from_value(value)
            .map(Self)
            .map_err(|e| AppError::field("body", e.to_string()))
    }
}

/// Query string extractor whose rejections use the API error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Health probes, public forms and settings.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/api/contact", post(contact::submit))
        .route("/api/partner-request", post(partner_request::submit))
        .route("/api/settings", get(settings::show).post(settings::update))
}

/// Routes mounted under `/api/admin`, refused while the panel is locked.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Account
        .route("/me", get(account::me))
        .route("/reset-password", post(account::reset_password))
        // Forms
        .route("/inquiries", get(inquiries::list))
        .route(
            "/inquiries/{id}",
            patch(inquiries::update_status).delete(inquiries::delete),
        )
        .route("/partner-requests", get(partner_requests::list))
        .route("/partner-requests/{id}", patch(partner_requests::update_status))
        // Admin accounts
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", patch(users::set_status).delete(users::delete))
        // Secrets
        .route("/secrets/projects", get(secrets::projects))
        .route("/secrets/configs", get(secrets::configs))
        .route("/secrets/audit", get(secrets::audit))
        .route(
            "/secrets",
            get(secrets::list).post(secrets::set).delete(secrets::delete),
        )
        // Deployments
        .route(
            "/deployments",
            get(deployments::list).post(deployments::create),
        )
        .route(
            "/deployments/{id}",
            get(deployments::show)
                .patch(deployments::promote)
                .delete(deployments::cancel),
        )
        .route("/deployments/{id}/logs", get(deployments::logs))
        .route("/domains", get(deployments::domains))
        .layer(from_fn_with_state(state.clone(), admin_lock_middleware))
}
