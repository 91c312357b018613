//! Vercel API client for deployment management.
//!
//! Scoped to one project (`VERCEL_PROJECT_ID`) and optionally one team
//! (`VERCEL_TEAM_ID`). Without a token the deployment endpoints answer 503.
//!
//! # API Reference
//!
//! - Base URL: `https://api.vercel.com`
//! - Authentication: `Authorization: Bearer <token>`
//! - Team scope: `teamId` query parameter on every call

mod types;

pub use types::{
    Creator, Deployment, DeploymentState, DeploymentTarget, Domain, GitMeta,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::VercelConfig;
use types::{
    CreateDeploymentRequest, DeploymentsResponse, DomainsResponse, GitSource, ProjectSettings,
    PromoteRequest,
};

/// Vercel API base URL.
const BASE_URL: &str = "https://api.vercel.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when interacting with the Vercel API.
#[derive(Debug, Error)]
pub enum VercelError {
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

    /// Unauthorized (invalid token or team).
    #[error("Unauthorized: check VERCEL_TOKEN and VERCEL_TEAM_ID")]
    Unauthorized,
}

/// A deployment platform the owner can drive.
#[async_trait]
pub trait DeploymentPlatform: Send + Sync {
    /// Most recent deployments of the project.
    async fn list_deployments(&self, limit: u32) -> Result<Vec<Deployment>, VercelError>;

    /// One deployment.
    async fn deployment(&self, id: &str) -> Result<Deployment, VercelError>;

    /// Deploy the project's linked repository.
    async fn create_deployment(&self, target: DeploymentTarget)
    -> Result<Deployment, VercelError>;

    /// Cancel a deployment that is still building.
    async fn cancel_deployment(&self, id: &str) -> Result<(), VercelError>;

    /// Redeploy an existing deployment's source to production.
    async fn promote_deployment(&self, id: &str) -> Result<Deployment, VercelError>;

    /// Build events of a deployment, as returned by the platform.
    async fn deployment_events(&self, id: &str) -> Result<Value, VercelError>;

    /// Domains attached to the project.
    async fn domains(&self) -> Result<Vec<Domain>, VercelError>;
}

/// Vercel API client.
#[derive(Clone)]
pub struct VercelClient {
    inner: Arc<VercelClientInner>,
}

struct VercelClientInner {
    client: reqwest::Client,
    project_id: String,
    team_id: Option<String>,
}

impl VercelClient {
    /// Create a new Vercel API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &VercelConfig) -> Result<Self, VercelError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| VercelError::Parse(format!("Invalid token format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(VercelClientInner {
                client,
                project_id: config.project_id.clone(),
                team_id: config.team_id.clone(),
            }),
        })
    }

    /// Build a URL from path segments, adding `query` and the team scope.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, VercelError> {
        let path: Vec<String> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        let mut url = Url::parse(&format!("{BASE_URL}/{}", path.join("/")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.extend_pairs(query);
            if let Some(team_id) = &self.inner.team_id {
                pairs.append_pair("teamId", team_id);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, VercelError> {
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, VercelError> {
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response, parsing JSON or extracting error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, VercelError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| VercelError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse error response from the Vercel API.
    async fn parse_error(response: reqwest::Response) -> VercelError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return VercelError::Unauthorized;
        }

        if status == 404 {
            return VercelError::NotFound("Resource not found".to_string());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::warn!(status, message = %message, "Vercel API error");
        VercelError::Api { status, message }
    }

    async fn project_settings(&self) -> Result<ProjectSettings, VercelError> {
        let url = self.url(&["v9", "projects", &self.inner.project_id], &[])?;
        self.get(url).await
    }
}

#[async_trait]
impl DeploymentPlatform for VercelClient {
    async fn list_deployments(&self, limit: u32) -> Result<Vec<Deployment>, VercelError> {
        let limit = limit.to_string();
        let url = self.url(
            &["v6", "deployments"],
            &[
                ("limit", limit.as_str()),
                ("projectId", self.inner.project_id.as_str()),
            ],
        )?;
        let response: DeploymentsResponse = self.get(url).await?;
        Ok(response.deployments)
    }

    async fn deployment(&self, id: &str) -> Result<Deployment, VercelError> {
        let url = self.url(&["v13", "deployments", id], &[])?;
        self.get(url).await
    }

    async fn create_deployment(
        &self,
        target: DeploymentTarget,
    ) -> Result<Deployment, VercelError> {
        let project = self.project_settings().await?;

        let git_ref = match (&project.link, target) {
            (Some(link), DeploymentTarget::Production) => {
                link.production_branch.as_deref().unwrap_or("main")
            }
            _ => "staging",
        };
        let git_source = project.link.as_ref().and_then(|link| {
            link.repo_id.as_ref().map(|repo_id| GitSource {
                provider: &link.provider,
                repo_id,
                git_ref,
            })
        });
        if git_source.is_none() {
            tracing::warn!(
                project_id = %self.inner.project_id,
                "Project has no linked repository, deploying without git source"
            );
        }

        let body = CreateDeploymentRequest {
            name: &self.inner.project_id,
            target: target.as_str(),
            git_source,
        };
        let url = self.url(&["v13", "deployments"], &[])?;
        let deployment: Deployment = self.post(url, &body).await?;

        tracing::info!(deployment_id = %deployment.id, target = target.as_str(), "Deployment created");
        Ok(deployment)
    }

    async fn cancel_deployment(&self, id: &str) -> Result<(), VercelError> {
        let url = self.url(&["v12", "deployments", id, "cancel"], &[])?;
        let response = self.inner.client.patch(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        tracing::info!(deployment_id = %id, "Deployment canceled");
        Ok(())
    }

    async fn promote_deployment(&self, id: &str) -> Result<Deployment, VercelError> {
        let body = PromoteRequest {
            deployment_id: id,
            name: &self.inner.project_id,
            target: DeploymentTarget::Production.as_str(),
        };
        let url = self.url(&["v13", "deployments"], &[("forceNew", "1")])?;
        let deployment: Deployment = self.post(url, &body).await?;

        tracing::info!(source = %id, deployment_id = %deployment.id, "Deployment promoted");
        Ok(deployment)
    }

    async fn deployment_events(&self, id: &str) -> Result<Value, VercelError> {
        let url = self.url(&["v2", "deployments", id, "events"], &[])?;
        self.get(url).await
    }

    async fn domains(&self) -> Result<Vec<Domain>, VercelError> {
        let url = self.url(
            &["v9", "projects", &self.inner.project_id, "domains"],
            &[("limit", "50")],
        )?;
        let response: DomainsResponse = self.get(url).await?;
        Ok(response.domains)
    }
}

impl std::fmt::Debug for VercelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VercelClient")
            .field("project_id", &self.inner.project_id)
            .field("team_id", &self.inner.team_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client(team_id: Option<&str>) -> VercelClient {
        VercelClient::new(&VercelConfig {
            token: SecretString::from("tok_abcdef"),
            project_id: "prj_zen".to_string(),
            team_id: team_id.map(str::to_string),
        })
        .unwrap()
    }

    #[test]
    fn test_url_without_team_has_no_query() {
        let url = client(None).url(&["v13", "deployments", "dpl_1"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.vercel.com/v13/deployments/dpl_1");
    }

    #[test]
    fn test_url_appends_team_scope() {
        let url = client(Some("team_1"))
            .url(&["v6", "deployments"], &[("limit", "20")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.vercel.com/v6/deployments?limit=20&teamId=team_1"
        );
    }

    #[test]
    fn test_url_encodes_ids() {
        let url = client(None).url(&["v13", "deployments", "a/b"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.vercel.com/v13/deployments/a%2Fb");
    }

    #[test]
    fn test_debug_hides_token() {
        assert!(!format!("{:?}", client(None)).contains("tok_abcdef"));
    }
}
