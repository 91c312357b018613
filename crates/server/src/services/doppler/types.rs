//! Doppler API types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A Doppler project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A config (environment branch) inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    pub name: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One secret value. `computed` has references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretValue {
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub computed: Option<String>,
}

/// Author of an audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub user: Option<AuditUser>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Secrets keyed by name.
pub type Secrets = BTreeMap<String, SecretValue>;

#[derive(Debug, Deserialize)]
pub(super) struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConfigsResponse {
    #[serde(default)]
    pub configs: Vec<SecretConfig>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SecretsResponse {
    #[serde(default)]
    pub secrets: Secrets,
}

#[derive(Debug, Deserialize)]
pub(super) struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<AuditLogEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct SetSecretsRequest<'a> {
    pub project: &'a str,
    pub config: &'a str,
    pub secrets: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteSecretsRequest<'a> {
    pub project: &'a str,
    pub config: &'a str,
    pub secrets: [&'a str; 1],
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_secrets_response_tolerates_nulls() {
        let parsed: SecretsResponse = serde_json::from_value(json!({
            "secrets": {
                "API_URL": {"raw": "${BASE}/api", "computed": "https://x/api"},
                "EMPTY": {"raw": null, "computed": null}
            },
            "success": true
        }))
        .unwrap();

        assert_eq!(parsed.secrets.len(), 2);
        assert_eq!(
            parsed.secrets.get("API_URL").unwrap().computed.as_deref(),
            Some("https://x/api")
        );
        assert!(parsed.secrets.get("EMPTY").unwrap().raw.is_none());
    }

    #[test]
    fn test_delete_request_shape() {
        let body = serde_json::to_value(DeleteSecretsRequest {
            project: "web",
            config: "prd",
            secrets: ["OLD_KEY"],
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"project": "web", "config": "prd", "secrets": ["OLD_KEY"]})
        );
    }
}
