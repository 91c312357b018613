//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `APPWRITE_ENDPOINT` - Backend REST endpoint (e.g., `https://fra.cloud.appwrite.io/v1`)
//! - `APPWRITE_PROJECT_ID` - Backend project ID
//! - `APPWRITE_API_KEY` - Server API key (HIGH PRIVILEGE)
//! - `APPWRITE_DATABASE_ID` - Database holding the form collections
//! - `SMTP_HOST` - SMTP server hostname
//! - `SMTP_USERNAME` - SMTP authentication username
//! - `SMTP_PASSWORD` - SMTP authentication password
//! - `SMTP_FROM` - Email sender address
//! - `APP_BASE_URL` - Public URL of the site (used in admin emails)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `APPWRITE_INQUIRIES_COLLECTION_ID` (default: inquiries)
//! - `APPWRITE_PARTNER_REQUESTS_COLLECTION_ID` (default: `partner_requests`)
//! - `APPWRITE_SETTINGS_COLLECTION_ID` (default: settings)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `FORM_RATE_LIMIT_PER_HOUR` - Public form submissions per IP per hour (default: 5)
//! - `SETTINGS_CACHE_TTL_SECS` - Settings cache lifetime (default: 30)
//! - `OWNER_CACHE_TTL_SECS` - Owner id cache lifetime (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (Doppler - enables the secrets endpoints)
//! - `DOPPLER_TOKEN` - Doppler service or personal token
//!
//! ## Optional (Vercel - enables the deployment endpoints)
//! - `VERCEL_TOKEN` - Vercel API token
//! - `VERCEL_PROJECT_ID` - Project to manage
//! - `VERCEL_TEAM_ID` - Team scope, if the project belongs to a team

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Document and identity backend
    pub appwrite: AppwriteConfig,
    /// Email configuration
    pub email: EmailConfig,
    /// Secret manager (optional - secrets endpoints answer 503 without it)
    pub doppler: Option<DopplerConfig>,
    /// Deployment platform (optional - deployment endpoints answer 503 without it)
    pub vercel: Option<VercelConfig>,
    /// Public form submissions allowed per client IP per hour
    pub form_rate_limit_per_hour: NonZeroU32,
    /// How long settings stay cached
    pub settings_cache_ttl: Duration,
    /// How long the resolved owner id stays cached
    pub owner_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Backend configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE API key.
#[derive(Clone)]
pub struct AppwriteConfig {
    /// REST endpoint including the `/v1` suffix
    pub endpoint: String,
    /// Project ID
    pub project_id: String,
    /// Server API key (HIGH PRIVILEGE - full project access)
    pub api_key: SecretString,
    /// Database ID
    pub database_id: String,
    /// Collection holding contact form inquiries
    pub inquiries_collection_id: String,
    /// Collection holding partner requests
    pub partner_requests_collection_id: String,
    /// Collection holding key/value settings documents
    pub settings_collection_id: String,
}

impl std::fmt::Debug for AppwriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("inquiries_collection_id", &self.inquiries_collection_id)
            .field(
                "partner_requests_collection_id",
                &self.partner_requests_collection_id,
            )
            .field("settings_collection_id", &self.settings_collection_id)
            .finish()
    }
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Doppler API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct DopplerConfig {
    /// Doppler API token
    pub token: SecretString,
}

impl std::fmt::Debug for DopplerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DopplerConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Vercel API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct VercelConfig {
    /// Vercel API token
    pub token: SecretString,
    /// Project ID or name
    pub project_id: String,
    /// Team scope
    pub team_id: Option<String>,
}

impl std::fmt::Debug for VercelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VercelConfig")
            .field("token", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("team_id", &self.team_id)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("APP_BASE_URL")?;

        let appwrite = AppwriteConfig::from_env()?;
        let email = EmailConfig::from_env()?;
        let doppler = DopplerConfig::from_env();
        let vercel = VercelConfig::from_env()?;

        let form_rate_limit_per_hour = get_env_or_default("FORM_RATE_LIMIT_PER_HOUR", "5")
            .parse::<NonZeroU32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FORM_RATE_LIMIT_PER_HOUR".to_string(), e.to_string())
            })?;
        let settings_cache_ttl = get_duration_secs("SETTINGS_CACHE_TTL_SECS", 30)?;
        let owner_cache_ttl = get_duration_secs("OWNER_CACHE_TTL_SECS", 60)?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            base_url,
            appwrite,
            email,
            doppler,
            vercel,
            form_rate_limit_per_hour,
            settings_cache_ttl,
            owner_cache_ttl,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// URL of the admin panel login page, used in welcome emails.
    #[must_use]
    pub fn admin_login_url(&self) -> String {
        format!("{}/admin/login", self.base_url.trim_end_matches('/'))
    }
}

impl AppwriteConfig {
    /// Load the backend settings alone, for tools that need no email or
    /// integrations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_required_env("APPWRITE_ENDPOINT")?;
        url::Url::parse(&endpoint)
            .map_err(|e| ConfigError::InvalidEnvVar("APPWRITE_ENDPOINT".to_string(), e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: get_required_env("APPWRITE_PROJECT_ID")?,
            api_key: get_validated_secret("APPWRITE_API_KEY")?,
            database_id: get_required_env("APPWRITE_DATABASE_ID")?,
            inquiries_collection_id: get_env_or_default(
                "APPWRITE_INQUIRIES_COLLECTION_ID",
                "inquiries",
            ),
            partner_requests_collection_id: get_env_or_default(
                "APPWRITE_PARTNER_REQUESTS_COLLECTION_ID",
                "partner_requests",
            ),
            settings_collection_id: get_env_or_default(
                "APPWRITE_SETTINGS_COLLECTION_ID",
                "settings",
            ),
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            smtp_host: get_required_env("SMTP_HOST")?,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_validated_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("SMTP_FROM")?,
        })
    }
}

impl DopplerConfig {
    /// Load Doppler configuration from environment.
    ///
    /// Returns `None` if `DOPPLER_TOKEN` is not set (secrets endpoints disabled).
    fn from_env() -> Option<Self> {
        get_optional_env("DOPPLER_TOKEN").map(|token| {
            if let Err(e) = validate_secret_strength(&token, "DOPPLER_TOKEN") {
                tracing::warn!("DOPPLER_TOKEN validation warning: {e}");
            }
            Self {
                token: SecretString::from(token),
            }
        })
    }
}

impl VercelConfig {
    /// Load Vercel configuration from environment.
    ///
    /// `VERCEL_TOKEN` and `VERCEL_PROJECT_ID` must be set together.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let token = get_optional_env("VERCEL_TOKEN");
        let project_id = get_optional_env("VERCEL_PROJECT_ID");

        match (token, project_id) {
            (Some(token), Some(project_id)) => {
                if let Err(e) = validate_secret_strength(&token, "VERCEL_TOKEN") {
                    tracing::warn!("VERCEL_TOKEN validation warning: {e}");
                }
                Ok(Some(Self {
                    token: SecretString::from(token),
                    project_id,
                    team_id: get_optional_env("VERCEL_TEAM_ID"),
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "VERCEL_*".to_string(),
                "Both VERCEL_TOKEN and VERCEL_PROJECT_ID must be set together".to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a duration in whole seconds.
fn get_duration_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    get_env_or_default(key, &default.to_string())
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://zenzebra.in/".to_string(),
            appwrite: AppwriteConfig {
                endpoint: "https://fra.cloud.appwrite.io/v1".to_string(),
                project_id: "project".to_string(),
                api_key: SecretString::from("standard_3f9a1c"),
                database_id: "main".to_string(),
                inquiries_collection_id: "inquiries".to_string(),
                partner_requests_collection_id: "partner_requests".to_string(),
                settings_collection_id: "settings".to_string(),
            },
            email: EmailConfig {
                smtp_host: "smtp.zenzebra.in".to_string(),
                smtp_port: 587,
                smtp_username: "mailer".to_string(),
                smtp_password: SecretString::from("hunter2"),
                from_address: "ZenZebra <hello@zenzebra.in>".to_string(),
            },
            doppler: None,
            vercel: None,
            form_rate_limit_per_hour: NonZeroU32::new(5).unwrap(),
            settings_cache_ttl: Duration::from_secs(30),
            owner_cache_ttl: Duration::from_secs(60),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = sample_config();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_admin_login_url_trims_slash() {
        let config = sample_config();
        assert_eq!(config.admin_login_url(), "https://zenzebra.in/admin/login");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = sample_config();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("standard_3f9a1c"));
        assert!(!debug.contains("hunter2"));
    }
}
