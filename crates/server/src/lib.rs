//! ZenZebra server library.
//!
//! Public form API plus the admin back-office API. The binary in `main.rs`
//! adds tracing, Sentry and the admin rate limiter around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod appwrite;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Build the application router without the admin rate limiter.
#[must_use]
pub fn app(state: AppState) -> Router {
    router(state, None)
}

/// Build the application router, optionally rate limiting `/api/admin`.
#[must_use]
pub fn router(
    state: AppState,
    admin_limit: Option<middleware::rate_limit::RateLimiterLayer>,
) -> Router {
    let mut admin = routes::admin_routes(&state);
    if let Some(layer) = admin_limit {
        admin = admin.layer(layer);
    }

    routes::public_routes()
        .nest("/api/admin", admin)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
