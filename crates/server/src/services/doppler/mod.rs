//! Doppler API client for secret management.
//!
//! Owners browse projects and configs, edit secrets and read the audit log
//! from the admin panel. The service is optional: without `DOPPLER_TOKEN`
//! the secrets endpoints answer 503.
//!
//! # API Reference
//!
//! - Base URL: `https://api.doppler.com/v3`
//! - Authentication: `Authorization: Bearer <token>`

mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use url::Url;

use crate::config::DopplerConfig;

/// Doppler API base URL.
const BASE_URL: &str = "https://api.doppler.com/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when interacting with the Doppler API.
#[derive(Debug, Error)]
pub enum DopplerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unauthorized (invalid token).
    #[error("Unauthorized: invalid API token")]
    Unauthorized,
}

/// A secret manager the owner can administer.
#[async_trait]
pub trait SecretsManager: Send + Sync {
    /// Every project visible to the token.
    async fn projects(&self) -> Result<Vec<Project>, DopplerError>;

    /// Configs of one project.
    async fn configs(&self, project: &str) -> Result<Vec<SecretConfig>, DopplerError>;

    /// Secrets of one config.
    async fn secrets(&self, project: &str, config: &str) -> Result<Secrets, DopplerError>;

    /// Create or update secrets in one call.
    async fn set_secrets(
        &self,
        project: &str,
        config: &str,
        secrets: &BTreeMap<String, String>,
    ) -> Result<(), DopplerError>;

    /// Delete one secret.
    async fn delete_secret(&self, project: &str, config: &str, name: &str)
    -> Result<(), DopplerError>;

    /// One page of a project's audit log. Pages start at 1.
    async fn audit_log(
        &self,
        project: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AuditLogEntry>, DopplerError>;
}

/// Doppler API client.
#[derive(Clone)]
pub struct DopplerClient {
    inner: Arc<DopplerClientInner>,
}

struct DopplerClientInner {
    client: reqwest::Client,
}

impl DopplerClient {
    /// Create a new Doppler API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &DopplerConfig) -> Result<Self, DopplerError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| DopplerError::Parse(format!("Invalid token format: {e}")))?,
        );
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(DopplerClientInner { client }),
        })
    }

    fn url(path: &str, query: &[(&str, &str)]) -> Result<Url, DopplerError> {
        let mut url = Url::parse(&format!("{BASE_URL}{path}"))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, DopplerError> {
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response, parsing JSON or extracting error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DopplerError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| DopplerError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Succeed on any 2xx, ignoring the body.
    async fn expect_success(response: reqwest::Response) -> Result<(), DopplerError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Parse error response from the Doppler API.
    async fn parse_error(response: reqwest::Response) -> DopplerError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return DopplerError::Unauthorized;
        }

        if status == 404 {
            return DopplerError::NotFound("Resource not found".to_string());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        DopplerError::Api { status, message }
    }
}

#[async_trait]
impl SecretsManager for DopplerClient {
    async fn projects(&self) -> Result<Vec<Project>, DopplerError> {
        let response: ProjectsResponse = self.get(Self::url("/projects", &[])?).await?;
        Ok(response.projects)
    }

    async fn configs(&self, project: &str) -> Result<Vec<SecretConfig>, DopplerError> {
        let url = Self::url("/configs", &[("project", project)])?;
        let response: ConfigsResponse = self.get(url).await?;
        Ok(response.configs)
    }

    async fn secrets(&self, project: &str, config: &str) -> Result<Secrets, DopplerError> {
        let url = Self::url(
            "/configs/config/secrets",
            &[("project", project), ("config", config)],
        )?;
        let response: SecretsResponse = self.get(url).await?;
        Ok(response.secrets)
    }

    async fn set_secrets(
        &self,
        project: &str,
        config: &str,
        secrets: &BTreeMap<String, String>,
    ) -> Result<(), DopplerError> {
        let body = SetSecretsRequest {
            project,
            config,
            secrets,
        };
        let response = self
            .inner
            .client
            .post(Self::url("/configs/config/secrets", &[])?)
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await?;

        tracing::info!(project = %project, config = %config, count = secrets.len(), "Secrets updated");
        Ok(())
    }

    async fn delete_secret(
        &self,
        project: &str,
        config: &str,
        name: &str,
    ) -> Result<(), DopplerError> {
        let body = DeleteSecretsRequest {
            project,
            config,
            secrets: [name],
        };
        let response = self
            .inner
            .client
            .delete(Self::url("/configs/config/secrets", &[])?)
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await?;

        tracing::info!(project = %project, config = %config, name = %name, "Secret deleted");
        Ok(())
    }

    async fn audit_log(
        &self,
        project: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AuditLogEntry>, DopplerError> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let url = Self::url(
            "/logs",
            &[
                ("project", project),
                ("page", page.as_str()),
                ("per_page", per_page.as_str()),
            ],
        )?;
        let response: LogsResponse = self.get(url).await?;
        Ok(response.logs)
    }
}

impl std::fmt::Debug for DopplerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DopplerClient").finish_non_exhaustive()
    }
}
