//! Liveness and readiness probes.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::state::AppState;

/// Upper bound on the backend probe.
const READY_TIMEOUT: Duration = Duration::from_secs(3);

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: the document backend must answer in time.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::time::timeout(READY_TIMEOUT, state.documents().ping()).await {
        Ok(Ok(())) => (StatusCode::OK, "ready"),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "backend unavailable")
        }
        Err(_) => {
            tracing::warn!(timeout_secs = READY_TIMEOUT.as_secs(), "Readiness check timed out");
            (StatusCode::SERVICE_UNAVAILABLE, "backend timeout")
        }
    }
}
