//! Vercel API types.
//!
//! Deployment payloads differ between API versions (`uid`/`state` in the
//! listing, `id`/`readyState` in the detail view), so both shapes parse into
//! one [`Deployment`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build state of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    Queued,
    Initializing,
    Building,
    Ready,
    Error,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Who triggered a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub uid: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Git metadata attached to a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitMeta {
    #[serde(default)]
    pub github_commit_ref: Option<String>,
    #[serde(default)]
    pub github_commit_sha: Option<String>,
    #[serde(default)]
    pub github_commit_message: Option<String>,
}

/// A deployment of the configured project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeployment", rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    /// Creation time in milliseconds since the epoch.
    pub created_at: Option<i64>,
    pub state: Option<DeploymentState>,
    /// `production`, or `None` for previews.
    pub target: Option<String>,
    pub creator: Option<Creator>,
    pub meta: GitMeta,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeployment {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    state: Option<DeploymentState>,
    #[serde(default)]
    ready_state: Option<DeploymentState>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    creator: Option<Creator>,
    #[serde(default)]
    meta: Option<GitMeta>,
}

impl TryFrom<RawDeployment> for Deployment {
    type Error = String;

    fn try_from(raw: RawDeployment) -> Result<Self, Self::Error> {
        let id = raw
            .uid
            .or(raw.id)
            .ok_or_else(|| "deployment without id".to_string())?;
        Ok(Self {
            id,
            name: raw.name,
            url: raw.url,
            created_at: raw.created.or(raw.created_at),
            state: raw.state.or(raw.ready_state),
            target: raw.target,
            creator: raw.creator,
            meta: raw.meta.unwrap_or_default(),
        })
    }
}

/// A domain attached to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created: Option<i64>,
}

/// Where a new deployment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentTarget {
    Production,
    Preview,
}

impl DeploymentTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Preview => "preview",
        }
    }
}

impl std::str::FromStr for DeploymentTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "preview" => Ok(Self::Preview),
            _ => Err(r#"must be "production" or "preview""#.to_string()),
        }
    }
}

/// Git link of a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectLink {
    #[serde(rename = "type")]
    pub provider: String,
    /// Number or string depending on the provider.
    #[serde(default)]
    pub repo_id: Option<Value>,
    #[serde(default)]
    pub production_branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ProjectSettings {
    #[serde(default)]
    pub link: Option<ProjectLink>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeploymentsResponse {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DomainsResponse {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Serialize)]
pub(super) struct GitSource<'a> {
    #[serde(rename = "type")]
    pub provider: &'a str,
    #[serde(rename = "repoId")]
    pub repo_id: &'a Value,
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateDeploymentRequest<'a> {
    pub name: &'a str,
    pub target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_source: Option<GitSource<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PromoteRequest<'a> {
    pub deployment_id: &'a str,
    pub name: &'a str,
    pub target: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_listing_shape() {
        let parsed: DeploymentsResponse = serde_json::from_value(json!({
            "deployments": [{
                "uid": "dpl_1",
                "name": "zenzebra",
                "url": "zenzebra-abc.vercel.app",
                "created": 1_740_000_000_000_i64,
                "state": "READY",
                "target": "production",
                "creator": {"uid": "u1", "username": "asha"},
                "meta": {"githubCommitRef": "main", "githubCommitSha": "abc123", "githubRepo": "web"}
            }]
        }))
        .unwrap();

        let deployment = &parsed.deployments[0];
        assert_eq!(deployment.id, "dpl_1");
        assert_eq!(deployment.state, Some(DeploymentState::Ready));
        assert_eq!(deployment.meta.github_commit_ref.as_deref(), Some("main"));
        assert_eq!(deployment.created_at, Some(1_740_000_000_000));
    }

    #[test]
    fn test_detail_shape() {
        let deployment: Deployment = serde_json::from_value(json!({
            "id": "dpl_2",
            "name": "zenzebra",
            "createdAt": 1_740_000_000_000_i64,
            "readyState": "BUILDING",
            "target": null
        }))
        .unwrap();

        assert_eq!(deployment.id, "dpl_2");
        assert_eq!(deployment.state, Some(DeploymentState::Building));
        assert!(deployment.target.is_none());
    }

    #[test]
    fn test_unknown_state_tolerated() {
        let deployment: Deployment =
            serde_json::from_value(json!({"uid": "d", "state": "DELETED"})).unwrap();
        assert_eq!(deployment.state, Some(DeploymentState::Unknown));
    }

    #[test]
    fn test_missing_id_rejected() {
        assert!(serde_json::from_value::<Deployment>(json!({"name": "x"})).is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let deployment: Deployment = serde_json::from_value(json!({"uid": "d", "created": 5})).unwrap();
        let out = serde_json::to_value(&deployment).unwrap();
        assert_eq!(out["id"], "d");
        assert_eq!(out["createdAt"], 5);
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("production".parse(), Ok(DeploymentTarget::Production));
        assert_eq!("preview".parse(), Ok(DeploymentTarget::Preview));
        assert!("staging".parse::<DeploymentTarget>().is_err());
    }

    #[test]
    fn test_create_request_omits_missing_git_source() {
        let body = serde_json::to_value(CreateDeploymentRequest {
            name: "zenzebra",
            target: "preview",
            git_source: None,
        })
        .unwrap();
        assert_eq!(body, json!({"name": "zenzebra", "target": "preview"}));
    }
}
