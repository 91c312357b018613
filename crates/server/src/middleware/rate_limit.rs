//! Rate limiting with governor and `tower_governor`.
//!
//! - Public forms: a keyed limiter in [`AppState`] allowing
//!   `FORM_RATE_LIMIT_PER_HOUR` submissions per client IP, checked by the
//!   [`FormRateLimit`] extractor.
//! - Admin API: [`admin_api_rate_limiter`], a `tower_governor` layer applied
//!   in the binary.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, Request, request::Parts},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::AppError;
use crate::state::AppState;

/// Address used when no proxy header carries a usable client IP.
const FALLBACK_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

/// Real client IP behind Cloudflare or another proxy.
///
/// Checks `CF-Connecting-IP`, then the first hop of `X-Forwarded-For`, then
/// `X-Real-IP`, and falls back to `127.0.0.1`.
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> IpAddr {
    ["cf-connecting-ip", "x-forwarded-for", "x-real-ip"]
        .iter()
        .find_map(|name| header_ip(headers, name))
        .unwrap_or(FALLBACK_IP)
}

/// Key extractor for `tower_governor` using [`client_ip`].
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req.headers()))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for the admin API: ~100 requests per minute per IP.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(1)` and `burst_size(50)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn admin_api_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(50) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Extractor that spends one form submission from the client's hourly quota.
///
/// Place it before the body extractor so a denied request does no work.
pub struct FormRateLimit;

impl FromRequestParts<AppState> for FormRateLimit {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip = client_ip(&parts.headers);
        if state.form_limiter().check_key(&ip).is_err() {
            tracing::warn!(client_ip = %ip, path = %parts.uri.path(), "Form rate limit exceeded");
            return Err(AppError::RateLimited);
        }
        Ok(Self)
    }
}
