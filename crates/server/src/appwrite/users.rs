//! Admin accounts over the backend's users and account APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use zenzebra_core::{AdminId, AdminPrefs, AdminPrincipal};

use super::{AppwriteClient, AppwriteError, Auth, with_queries};
use crate::db::new_document_id;
use crate::services::identity::{IdentityError, IdentityStore, NewAdmin};

const PAGE_SIZE: u32 = 100;

/// A user as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub registration: DateTime<Utc>,
    /// `false` when blocked.
    pub status: bool,
    #[serde(default)]
    pub mfa: bool,
    #[serde(default, deserialize_with = "prefs_or_default")]
    pub prefs: AdminPrefs,
}

impl From<UserRecord> for AdminPrincipal {
    fn from(user: UserRecord) -> Self {
        Self {
            id: AdminId::new(user.id),
            name: user.name,
            email: user.email,
            registered_at: user.registration,
            active: user.status,
            mfa_enabled: user.mfa,
            prefs: user.prefs,
        }
    }
}

/// Empty preferences sometimes come back as `[]`.
fn prefs_or_default<'de, D>(deserializer: D) -> Result<AdminPrefs, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(AdminPrefs::default()),
    }
}

#[derive(Debug, Deserialize)]
struct UserList {
    total: u64,
    users: Vec<UserRecord>,
}

impl From<AppwriteError> for IdentityError {
    fn from(err: AppwriteError) -> Self {
        match err.status() {
            Some(404) => Self::NotFound,
            Some(409) => Self::Conflict(err.to_string()),
            Some(400) => Self::Rejected(err.to_string()),
            _ => Self::Backend(err.to_string()),
        }
    }
}

impl AppwriteClient {
    fn user_url(&self, id: &AdminId, rest: &[&str]) -> Result<url::Url, AppwriteError> {
        let mut segments = vec!["users", id.as_str()];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }
}

#[async_trait]
impl IdentityStore for AppwriteClient {
    async fn principal_for_session(&self, token: &str) -> Result<AdminPrincipal, IdentityError> {
        let url = self.url(&["account"])?;
        match self
            .send::<UserRecord>(Method::GET, url, None, Auth::Session(token))
            .await
        {
            Ok(user) => Ok(user.into()),
            Err(e) if e.is_unauthorized() => Err(IdentityError::InvalidSession),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_principals(&self) -> Result<Vec<AdminPrincipal>, IdentityError> {
        let mut principals = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let queries = [
                json!({"method": "limit", "values": [PAGE_SIZE]}).to_string(),
                json!({"method": "offset", "values": [offset]}).to_string(),
            ];
            let url = with_queries(self.url(&["users"])?, &queries);
            let page: UserList = self.send(Method::GET, url, None, Auth::Key).await?;

            let fetched = page.users.len();
            principals.extend(page.users.into_iter().map(AdminPrincipal::from));

            if fetched < PAGE_SIZE as usize || principals.len() as u64 >= page.total {
                break;
            }
            offset += PAGE_SIZE;
        }

        Ok(principals)
    }

    async fn get_principal(&self, id: &AdminId) -> Result<AdminPrincipal, IdentityError> {
        let url = self.user_url(id, &[])?;
        let user: UserRecord = self.send(Method::GET, url, None, Auth::Key).await?;
        Ok(user.into())
    }

    async fn create_principal(&self, admin: &NewAdmin) -> Result<AdminPrincipal, IdentityError> {
        let url = self.url(&["users"])?;
        let body = json!({
            "userId": new_document_id(),
            "email": admin.email.as_str(),
            "password": admin.password.expose_secret(),
            "name": admin.name,
        });
        let user: UserRecord = self.send(Method::POST, url, Some(&body), Auth::Key).await?;
        Ok(user.into())
    }

    async fn delete_principal(&self, id: &AdminId) -> Result<(), IdentityError> {
        let url = self.user_url(id, &[])?;
        self.send_empty(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn set_active(
        &self,
        id: &AdminId,
        active: bool,
    ) -> Result<AdminPrincipal, IdentityError> {
        let url = self.user_url(id, &["status"])?;
        let body = json!({ "status": active });
        let user: UserRecord = self.send(Method::PATCH, url, Some(&body), Auth::Key).await?;
        Ok(user.into())
    }

    async fn update_prefs(
        &self,
        id: &AdminId,
        prefs: &AdminPrefs,
    ) -> Result<AdminPrefs, IdentityError> {
        let url = self.user_url(id, &["prefs"])?;
        let body = json!({ "prefs": prefs });
        let value: Value = self.send(Method::PATCH, url, Some(&body), Auth::Key).await?;
        serde_json::from_value(value).map_err(|e| IdentityError::Backend(e.to_string()))
    }

    async fn update_password(
        &self,
        id: &AdminId,
        password: &SecretString,
    ) -> Result<(), IdentityError> {
        let url = self.user_url(id, &["password"])?;
        let body = json!({ "password": password.expose_secret() });
        self.send_empty(Method::PATCH, url, Some(&body)).await?;
        Ok(())
    }

    async fn mark_email_verified(&self, id: &AdminId) -> Result<(), IdentityError> {
        let url = self.user_url(id, &["verification"])?;
        let body = json!({ "emailVerification": true });
        self.send_empty(Method::PATCH, url, Some(&body)).await?;
        Ok(())
    }
}
