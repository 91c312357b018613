//! REST client for the document and identity backend (Appwrite).
//!
//! One client serves both roles:
//! - [`DocumentStore`](crate::db::DocumentStore) in [`documents`]
//! - [`IdentityStore`](crate::services::identity::IdentityStore) in [`users`]
//!
//! # API Reference
//!
//! - Base URL: `APPWRITE_ENDPOINT` (includes `/v1`)
//! - Server calls: `X-Appwrite-Project` + `X-Appwrite-Key`
//! - Session calls: `X-Appwrite-Project` + `X-Appwrite-JWT` (no key, or the
//!   key would take precedence over the session)
//! - Queries: repeated `queries[]` parameters, each a JSON object such as
//!   `{"method":"orderDesc","attribute":"$createdAt"}`

mod documents;
mod users;

pub use users::UserRecord;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

use crate::config::AppwriteConfig;
use crate::db::{ListQuery, Order};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum AppwriteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// API returned an error response.
    #[error("API error: {status} {kind} - {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppwriteError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.status(), Some(409))
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
}

/// How a request authenticates.
enum Auth<'a> {
    /// Server API key.
    Key,
    /// End-user session JWT.
    Session(&'a str),
}

/// Backend REST client.
#[derive(Clone)]
pub struct AppwriteClient {
    inner: Arc<AppwriteClientInner>,
}

struct AppwriteClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    database_id: String,
}

impl AppwriteClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AppwriteConfig) -> Result<Self, AppwriteError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Appwrite-Project",
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| AppwriteError::Parse(format!("Invalid project id: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AppwriteClientInner {
                client,
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
                database_id: config.database_id.clone(),
            }),
        })
    }

    /// Build a URL from path segments. Segments are percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, AppwriteError> {
        let path: Vec<String> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        Ok(Url::parse(&format!(
            "{}/{}",
            self.inner.endpoint,
            path.join("/")
        ))?)
    }

    fn collection_url(&self, collection: &str, rest: &[&str]) -> Result<Url, AppwriteError> {
        let mut segments = vec![
            "databases",
            self.inner.database_id.as_str(),
            "collections",
            collection,
            "documents",
        ];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }

    /// Send a request and parse the JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        auth: Auth<'_>,
    ) -> Result<T, AppwriteError> {
        let response = self.dispatch(method, url, body, auth).await?;
        response
            .json()
            .await
            .map_err(|e| AppwriteError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Send a request whose response body is irrelevant.
    async fn send_empty(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(), AppwriteError> {
        self.dispatch(method, url, body, Auth::Key).await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        auth: Auth<'_>,
    ) -> Result<reqwest::Response, AppwriteError> {
        let mut request = self.inner.client.request(method, url);
        request = match auth {
            Auth::Key => request.header("X-Appwrite-Key", self.inner.api_key.expose_secret()),
            Auth::Session(jwt) => request.header("X-Appwrite-JWT", jwt),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::parse_error(response).await)
    }

    /// Parse an error response.
    async fn parse_error(response: reqwest::Response) -> AppwriteError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or_else(|_| ApiErrorBody {
            message: if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text.clone()
            },
            kind: String::new(),
        });

        AppwriteError::Api {
            status: status.as_u16(),
            kind: body.kind,
            message: body.message,
        }
    }
}

impl std::fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.inner.endpoint)
            .field("database_id", &self.inner.database_id)
            .finish_non_exhaustive()
    }
}

/// Encode a listing as `queries[]` JSON strings.
fn encode_queries(query: &ListQuery) -> Vec<String> {
    let mut out = Vec::new();
    for (field, value) in &query.equal {
        out.push(json!({"method": "equal", "attribute": field, "values": [value]}).to_string());
    }
    if let Some((attribute, order)) = &query.order {
        let method = match order {
            Order::Asc => "orderAsc",
            Order::Desc => "orderDesc",
        };
        out.push(json!({"method": method, "attribute": attribute}).to_string());
    }
    if let Some(limit) = query.limit {
        out.push(json!({"method": "limit", "values": [limit]}).to_string());
    }
    if let Some(offset) = query.offset {
        out.push(json!({"method": "offset", "values": [offset]}).to_string());
    }
    out
}

/// Append `queries[]` parameters to a URL.
fn with_queries(mut url: Url, queries: &[String]) -> Url {
    if !queries.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for q in queries {
            pairs.append_pair("queries[]", q);
        }
    }
    url
}
