//! Integration test harness for the ZenZebra server.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`.
//! Every collaborator is replaced by an in-memory implementation from this
//! crate, so the suite needs no network, backend or SMTP server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zenzebra-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tower::ServiceExt;
use zenzebra_core::{AdminId, AdminPrefs, AdminPrincipal};
use zenzebra_server::config::{AppwriteConfig, EmailConfig, ServerConfig};
use zenzebra_server::db::{Document, DocumentList, DocumentStore, ListQuery, Order, RepositoryError};
use zenzebra_server::services::doppler::{AuditLogEntry, Project, SecretConfig, SecretValue, Secrets};
use zenzebra_server::services::vercel::{Deployment, DeploymentState, DeploymentTarget, Domain, GitMeta};
use zenzebra_server::services::{
    DeploymentPlatform, DopplerError, EmailError, IdentityError, IdentityStore, Mailer, NewAdmin,
    OutgoingEmail, SecretsManager, VercelError,
};
use zenzebra_server::state::{AppState, Services};

// ============================================================================
// Document store
// ============================================================================

/// In-memory document collections.
///
/// Creation times increase by one second per document so ordering is
/// deterministic.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    clock: AtomicU64,
    offline: AtomicBool,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a backend error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every document of a collection, in insertion order.
    #[must_use]
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn tick(&self) -> DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(i64::try_from(n).unwrap())
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Backend("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<DocumentList, RepositoryError> {
        self.check_online()?;
        let mut documents: Vec<Document> = self
            .documents(collection)
            .into_iter()
            .filter(|doc| query.matches(doc))
            .collect();

        if let Some((field, order)) = &query.order {
            if field == "$createdAt" {
                documents.sort_by_key(|doc| doc.created_at);
                if *order == Order::Desc {
                    documents.reverse();
                }
            }
        }

        let total = documents.len() as u64;
        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        let documents = documents.into_iter().skip(offset).take(limit).collect();
        Ok(DocumentList { total, documents })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, RepositoryError> {
        self.check_online()?;
        self.documents(collection)
            .into_iter()
            .find(|doc| doc.id == id)
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        self.check_online()?;
        let now = self.tick();
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|doc| doc.id == id) {
            return Err(RepositoryError::Conflict(id.to_string()));
        }
        let doc = Document {
            id: id.to_string(),
            created_at: now,
            updated_at: now,
            data,
        };
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError> {
        self.check_online()?;
        let now = self.tick();
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or(RepositoryError::NotFound)?;
        doc.data.extend(data);
        doc.updated_at = now;
        Ok(doc.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_online()
    }
}

// ============================================================================
// Identity store
// ============================================================================

struct Account {
    principal: AdminPrincipal,
    password: String,
    email_verified: bool,
}

/// An identity call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityCall {
    UpdatePrefs,
    MarkEmailVerified,
}

/// In-memory admin accounts and sessions.
#[derive(Default)]
pub struct MemoryIdentityStore {
    accounts: Mutex<Vec<Account>>,
    sessions: Mutex<HashMap<String, AdminId>>,
    registrations: AtomicU64,
    failing: Mutex<Option<IdentityCall>>,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_registration(&self) -> DateTime<Utc> {
        let n = self.registrations.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(i64::try_from(n).unwrap())
    }

    /// Add an active admin with MFA enabled and nothing pending.
    ///
    /// Each call registers one day after the previous one, so the first
    /// admin added is the owner.
    pub fn add_admin(&self, name: &str, email: &str) -> AdminPrincipal {
        self.add_admin_with(name, email, AdminPrefs::default(), true)
    }

    /// Add an admin with explicit preferences and MFA state.
    pub fn add_admin_with(
        &self,
        name: &str,
        email: &str,
        prefs: AdminPrefs,
        mfa_enabled: bool,
    ) -> AdminPrincipal {
        let principal = AdminPrincipal {
            id: AdminId::new(uuid::Uuid::new_v4().simple().to_string()),
            name: name.to_string(),
            email: email.to_string(),
            registered_at: self.next_registration(),
            active: true,
            mfa_enabled,
            prefs,
        };
        self.accounts.lock().unwrap().push(Account {
            principal: principal.clone(),
            password: "initial-password".to_string(),
            email_verified: true,
        });
        principal
    }

    /// Issue a session token for an admin.
    pub fn session_for(&self, id: &AdminId) -> String {
        let token = format!("jwt-{}", uuid::Uuid::new_v4().simple());
        self.sessions
            .lock()
            .unwrap()
            .insert(token.clone(), id.clone());
        token
    }

    /// Current state of an account.
    #[must_use]
    pub fn principal(&self, id: &AdminId) -> Option<AdminPrincipal> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.principal.id == id)
            .map(|a| a.principal.clone())
    }

    /// Look an account up by email.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<AdminPrincipal> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.principal.email == email)
            .map(|a| a.principal.clone())
    }

    #[must_use]
    pub fn password(&self, id: &AdminId) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.principal.id == id)
            .map(|a| a.password.clone())
    }

    #[must_use]
    pub fn email_verified(&self, id: &AdminId) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .any(|a| &a.principal.id == id && a.email_verified)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    /// Make every later `call` fail with a backend error.
    pub fn fail_on(&self, call: IdentityCall) {
        *self.failing.lock().unwrap() = Some(call);
    }

    fn check(&self, call: IdentityCall) -> Result<(), IdentityError> {
        if *self.failing.lock().unwrap() == Some(call) {
            return Err(IdentityError::Backend("identity backend unavailable".to_string()));
        }
        Ok(())
    }

    fn with_account<T>(
        &self,
        id: &AdminId,
        f: impl FnOnce(&mut Account) -> T,
    ) -> Result<T, IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts
            .iter_mut()
            .find(|a| &a.principal.id == id)
            .map(f)
            .ok_or(IdentityError::NotFound)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn principal_for_session(&self, token: &str) -> Result<AdminPrincipal, IdentityError> {
        let id = self
            .sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidSession)?;
        self.principal(&id).ok_or(IdentityError::InvalidSession)
    }

    async fn list_principals(&self) -> Result<Vec<AdminPrincipal>, IdentityError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.principal.clone())
            .collect())
    }

    async fn get_principal(&self, id: &AdminId) -> Result<AdminPrincipal, IdentityError> {
        self.principal(id).ok_or(IdentityError::NotFound)
    }

    async fn create_principal(&self, admin: &NewAdmin) -> Result<AdminPrincipal, IdentityError> {
        if self.find_by_email(admin.email.as_str()).is_some() {
            return Err(IdentityError::Conflict(admin.email.to_string()));
        }
        let principal = AdminPrincipal {
            id: AdminId::new(uuid::Uuid::new_v4().simple().to_string()),
            name: admin.name.clone(),
            email: admin.email.to_string(),
            registered_at: self.next_registration(),
            active: true,
            mfa_enabled: false,
            prefs: AdminPrefs::default(),
        };
        self.accounts.lock().unwrap().push(Account {
            principal: principal.clone(),
            password: admin.password.expose_secret().to_string(),
            email_verified: false,
        });
        Ok(principal)
    }

    async fn delete_principal(&self, id: &AdminId) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| &a.principal.id != id);
        if accounts.len() == before {
            return Err(IdentityError::NotFound);
        }
        Ok(())
    }

    async fn set_active(
        &self,
        id: &AdminId,
        active: bool,
    ) -> Result<AdminPrincipal, IdentityError> {
        self.with_account(id, |a| {
            a.principal.active = active;
            a.principal.clone()
        })
    }

    async fn update_prefs(
        &self,
        id: &AdminId,
        prefs: &AdminPrefs,
    ) -> Result<AdminPrefs, IdentityError> {
        self.check(IdentityCall::UpdatePrefs)?;
        self.with_account(id, |a| {
            a.principal.prefs = prefs.clone();
            prefs.clone()
        })
    }

    async fn update_password(
        &self,
        id: &AdminId,
        password: &SecretString,
    ) -> Result<(), IdentityError> {
        self.with_account(id, |a| {
            a.password = password.expose_secret().to_string();
        })
    }

    async fn mark_email_verified(&self, id: &AdminId) -> Result<(), IdentityError> {
        self.check(IdentityCall::MarkEmailVerified)?;
        self.with_account(id, |a| a.email_verified = true)
    }
}

// ============================================================================
// Mailers
// ============================================================================

/// Records every email instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` emails went out, or about a second passed.
    ///
    /// Emails are sent from background tasks after the response is returned.
    pub async fn wait_for(&self, count: usize) -> Vec<OutgoingEmail> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }

    /// Give background sends a chance to run, then return what was sent.
    pub async fn settle(&self) -> Vec<OutgoingEmail> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.sent()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Fails every send.
#[derive(Default)]
pub struct FailingMailer {
    attempts: AtomicU64,
}

impl FailingMailer {
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(EmailError::InvalidAddress(format!(
            "relay refused {}",
            email.to
        )))
    }
}

// ============================================================================
// Secret manager
// ============================================================================

/// In-memory secret manager with one project and two configs.
#[derive(Default)]
pub struct FakeSecrets {
    secrets: Mutex<BTreeMap<(String, String), BTreeMap<String, String>>>,
}

impl FakeSecrets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a secret.
    #[must_use]
    pub fn value(&self, project: &str, config: &str, name: &str) -> Option<String> {
        self.secrets
            .lock()
            .unwrap()
            .get(&(project.to_string(), config.to_string()))
            .and_then(|s| s.get(name).cloned())
    }
}

#[async_trait]
impl SecretsManager for FakeSecrets {
    async fn projects(&self) -> Result<Vec<Project>, DopplerError> {
        Ok(vec![Project {
            id: "web".to_string(),
            name: "web".to_string(),
            description: Some("Public site".to_string()),
            created_at: None,
        }])
    }

    async fn configs(&self, project: &str) -> Result<Vec<SecretConfig>, DopplerError> {
        if project != "web" {
            return Err(DopplerError::NotFound(project.to_string()));
        }
        Ok(["dev", "prd"]
            .into_iter()
            .map(|name| SecretConfig {
                name: name.to_string(),
                environment: Some(name.to_string()),
                project: Some(project.to_string()),
                created_at: None,
            })
            .collect())
    }

    async fn secrets(&self, project: &str, config: &str) -> Result<Secrets, DopplerError> {
        let secrets = self.secrets.lock().unwrap();
        Ok(secrets
            .get(&(project.to_string(), config.to_string()))
            .map(|s| {
                s.iter()
                    .map(|(k, v)| {
                        (
                            k.clone(),
                            SecretValue {
                                raw: Some(v.clone()),
                                computed: Some(v.clone()),
                            },
                        )
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_secrets(
        &self,
        project: &str,
        config: &str,
        secrets: &BTreeMap<String, String>,
    ) -> Result<(), DopplerError> {
        self.secrets
            .lock()
            .unwrap()
            .entry((project.to_string(), config.to_string()))
            .or_default()
            .extend(secrets.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn delete_secret(
        &self,
        project: &str,
        config: &str,
        name: &str,
    ) -> Result<(), DopplerError> {
        let removed = self
            .secrets
            .lock()
            .unwrap()
            .get_mut(&(project.to_string(), config.to_string()))
            .and_then(|s| s.remove(name));
        removed
            .map(|_| ())
            .ok_or_else(|| DopplerError::NotFound(name.to_string()))
    }

    async fn audit_log(
        &self,
        _project: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<AuditLogEntry>, DopplerError> {
        Ok((0..per_page.min(3))
            .map(|i| AuditLogEntry {
                id: format!("log-{page}-{i}"),
                text: "Updated secret".to_string(),
                user: None,
                created_at: None,
            })
            .collect())
    }
}

// ============================================================================
// Deployment platform
// ============================================================================

/// In-memory deployment platform.
#[derive(Default)]
pub struct FakeDeployments {
    deployments: Mutex<Vec<Deployment>>,
}

impl FakeDeployments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn all(&self) -> Vec<Deployment> {
        self.deployments.lock().unwrap().clone()
    }

    fn push(&self, target: DeploymentTarget, git_ref: &str) -> Deployment {
        let mut deployments = self.deployments.lock().unwrap();
        let deployment = Deployment {
            id: format!("dpl_{}", deployments.len() + 1),
            name: "zenzebra".to_string(),
            url: Some(format!("zenzebra-{}.vercel.app", deployments.len() + 1)),
            created_at: Some(1_735_689_600_000),
            state: Some(DeploymentState::Building),
            target: matches!(target, DeploymentTarget::Production)
                .then(|| "production".to_string()),
            creator: None,
            meta: GitMeta {
                github_commit_ref: Some(git_ref.to_string()),
                ..GitMeta::default()
            },
        };
        deployments.push(deployment.clone());
        deployment
    }

    fn find(&self, id: &str) -> Result<Deployment, VercelError> {
        self.deployments
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| VercelError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl DeploymentPlatform for FakeDeployments {
    async fn list_deployments(&self, limit: u32) -> Result<Vec<Deployment>, VercelError> {
        Ok(self
            .all()
            .into_iter()
            .rev()
            .take(limit as usize)
            .collect())
    }

    async fn deployment(&self, id: &str) -> Result<Deployment, VercelError> {
        self.find(id)
    }

    async fn create_deployment(
        &self,
        target: DeploymentTarget,
    ) -> Result<Deployment, VercelError> {
        let git_ref = match target {
            DeploymentTarget::Production => "main",
            DeploymentTarget::Preview => "staging",
        };
        Ok(self.push(target, git_ref))
    }

    async fn cancel_deployment(&self, id: &str) -> Result<(), VercelError> {
        let mut deployments = self.deployments.lock().unwrap();
        let deployment = deployments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| VercelError::NotFound(id.to_string()))?;
        deployment.state = Some(DeploymentState::Canceled);
        Ok(())
    }

    async fn promote_deployment(&self, id: &str) -> Result<Deployment, VercelError> {
        let source = self.find(id)?;
        let git_ref = source.meta.github_commit_ref.unwrap_or_default();
        Ok(self.push(DeploymentTarget::Production, &git_ref))
    }

    async fn deployment_events(&self, id: &str) -> Result<Value, VercelError> {
        self.find(id)?;
        Ok(json!([{"type": "stdout", "text": "Build started"}]))
    }

    async fn domains(&self) -> Result<Vec<Domain>, VercelError> {
        Ok(vec![Domain {
            name: "zenzebra.in".to_string(),
            verified: true,
            created: None,
        }])
    }
}

// ============================================================================
// Test context
// ============================================================================

/// Configuration with test values; no network is touched.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "https://zenzebra.in".to_string(),
        appwrite: AppwriteConfig {
            endpoint: "https://appwrite.test/v1".to_string(),
            project_id: "zenzebra".to_string(),
            api_key: SecretString::from("test-key"),
            database_id: "main".to_string(),
            inquiries_collection_id: "inquiries".to_string(),
            partner_requests_collection_id: "partner_requests".to_string(),
            settings_collection_id: "settings".to_string(),
        },
        email: EmailConfig {
            smtp_host: "smtp.test".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("test-password"),
            from_address: "ZenZebra <hello@zenzebra.in>".to_string(),
        },
        doppler: None,
        vercel: None,
        form_rate_limit_per_hour: NonZeroU32::new(100).unwrap(),
        settings_cache_ttl: Duration::from_secs(30),
        owner_cache_ttl: Duration::from_secs(60),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A response decoded for assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// The router wired to in-memory collaborators.
pub struct TestContext {
    pub app: Router,
    pub documents: Arc<MemoryDocumentStore>,
    pub identity: Arc<MemoryIdentityStore>,
    pub mailer: Arc<RecordingMailer>,
    pub secrets: Arc<FakeSecrets>,
    pub deployments: Arc<FakeDeployments>,
}

/// Builder for [`TestContext`].
pub struct TestContextBuilder {
    config: ServerConfig,
    mailer: Option<Arc<dyn Mailer>>,
    integrations: bool,
}

impl TestContextBuilder {
    /// Adjust the configuration.
    #[must_use]
    pub fn config(mut self, f: impl FnOnce(&mut ServerConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Use a different mailer. [`TestContext::mailer`] then records nothing.
    #[must_use]
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Leave the secret manager and deployment platform unconfigured.
    #[must_use]
    pub const fn without_integrations(mut self) -> Self {
        self.integrations = false;
        self
    }

    #[must_use]
    pub fn build(self) -> TestContext {
        let documents = Arc::new(MemoryDocumentStore::new());
        let identity = Arc::new(MemoryIdentityStore::new());
        let recorder = Arc::new(RecordingMailer::new());
        let secrets = Arc::new(FakeSecrets::new());
        let deployments = Arc::new(FakeDeployments::new());

        let services = Services {
            documents: documents.clone(),
            identity: identity.clone(),
            mailer: self
                .mailer
                .unwrap_or_else(|| recorder.clone() as Arc<dyn Mailer>),
            secrets: self
                .integrations
                .then(|| secrets.clone() as Arc<dyn SecretsManager>),
            deployments: self
                .integrations
                .then(|| deployments.clone() as Arc<dyn DeploymentPlatform>),
        };

        let state = AppState::new(self.config, services);
        TestContext {
            app: zenzebra_server::app(state),
            documents,
            identity,
            mailer: recorder,
            secrets,
            deployments,
        }
    }
}

impl TestContext {
    #[must_use]
    pub fn builder() -> TestContextBuilder {
        TestContextBuilder {
            config: test_config(),
            mailer: None,
            integrations: true,
        }
    }

    /// Default context with every integration configured.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Add the owner (first registered admin) and return it with a session.
    pub fn owner(&self) -> (AdminPrincipal, String) {
        let owner = self.identity.add_admin("Owner", "owner@zenzebra.in");
        let token = self.identity.session_for(&owner.id);
        (owner, token)
    }

    /// Add a standard admin with nothing pending and return it with a session.
    pub fn admin(&self, name: &str, email: &str) -> (AdminPrincipal, String) {
        let admin = self.identity.add_admin(name, email);
        let token = self.identity.session_for(&admin.id);
        (admin, token)
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty or
    /// not JSON).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Owner-only settings update.
    pub async fn update_settings(&self, owner_token: &str, changes: Value) -> TestResponse {
        self.post("/api/settings", Some(owner_token), changes).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid contact form body.
#[must_use]
pub fn contact_form(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "9876543210",
        "query": "Do you ship to Pune?",
    })
}

/// A valid partner request body.
#[must_use]
pub fn partner_form(company: &str, email: &str) -> Value {
    json!({
        "name": "Meera Shah",
        "email": email,
        "phone": 9_123_456_780_u64,
        "companyName": company,
        "companyWebsite": "https://example.in",
        "remarks": "Retail spaces in Bengaluru",
    })
}
