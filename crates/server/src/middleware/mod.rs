//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first, see `main.rs`)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Security headers
//! 5. Admin API rate limit (`/api/admin` only)
//! 6. Admin kill switch (`/api/admin` only)

pub mod auth;
pub mod kill_switch;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAdmin, RequireOwner, RequireSession};
pub use kill_switch::{FormsOpen, admin_lock_middleware};
pub use rate_limit::{FormRateLimit, admin_api_rate_limiter, client_ip};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
