//! Application state shared across handlers.

use std::net::IpAddr;
use std::sync::Arc;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::appwrite::{AppwriteClient, AppwriteError};
use crate::config::ServerConfig;
use crate::db::DocumentStore;
use crate::services::{
    DeploymentPlatform, DopplerClient, DopplerError, IdentityStore, Mailer, Notifier,
    OwnerService, SecretsManager, SettingsService, SmtpMailer, VercelClient, VercelError,
};

/// Error building the production services.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("backend client: {0}")]
    Appwrite(#[from] AppwriteError),
    #[error("SMTP transport: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Doppler client: {0}")]
    Doppler(#[from] DopplerError),
    #[error("Vercel client: {0}")]
    Vercel(#[from] VercelError),
}

/// Collaborators the handlers talk to.
///
/// Production builds these from configuration with [`Services::from_config`];
/// tests pass in-memory implementations.
pub struct Services {
    pub documents: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityStore>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` disables the secrets endpoints.
    pub secrets: Option<Arc<dyn SecretsManager>>,
    /// `None` disables the deployment endpoints.
    pub deployments: Option<Arc<dyn DeploymentPlatform>>,
}

impl Services {
    /// Build the production clients.
    ///
    /// # Errors
    ///
    /// Returns an error if any client fails to build.
    pub fn from_config(config: &ServerConfig) -> Result<Self, StateError> {
        let appwrite = Arc::new(AppwriteClient::new(&config.appwrite)?);
        let mailer = Arc::new(SmtpMailer::new(&config.email)?);

        let secrets: Option<Arc<dyn SecretsManager>> = match &config.doppler {
            Some(doppler) => Some(Arc::new(DopplerClient::new(doppler)?)),
            None => None,
        };
        let deployments: Option<Arc<dyn DeploymentPlatform>> = match &config.vercel {
            Some(vercel) => Some(Arc::new(VercelClient::new(vercel)?)),
            None => None,
        };

        Ok(Self {
            documents: appwrite.clone(),
            identity: appwrite,
            mailer,
            secrets,
            deployments,
        })
    }
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    documents: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityStore>,
    notifier: Notifier,
    secrets: Option<Arc<dyn SecretsManager>>,
    deployments: Option<Arc<dyn DeploymentPlatform>>,
    settings: SettingsService,
    owner: OwnerService,
    form_limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, services: Services) -> Self {
        let settings = SettingsService::new(
            Arc::clone(&services.documents),
            config.appwrite.settings_collection_id.clone(),
            config.settings_cache_ttl,
        );
        let owner = OwnerService::new(Arc::clone(&services.identity), config.owner_cache_ttl);
        let form_limiter = RateLimiter::keyed(Quota::per_hour(config.form_rate_limit_per_hour));

        Self {
            inner: Arc::new(AppStateInner {
                notifier: Notifier::new(services.mailer),
                documents: services.documents,
                identity: services.identity,
                secrets: services.secrets,
                deployments: services.deployments,
                settings,
                owner,
                form_limiter,
                config,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the document backend.
    #[must_use]
    pub fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }

    /// Get the identity backend.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityStore {
        self.inner.identity.as_ref()
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// The secret manager, if configured.
    #[must_use]
    pub fn secrets(&self) -> Option<&dyn SecretsManager> {
        self.inner.secrets.as_deref()
    }

    /// The deployment platform, if configured.
    #[must_use]
    pub fn deployments(&self) -> Option<&dyn DeploymentPlatform> {
        self.inner.deployments.as_deref()
    }

    /// Get the cached settings service.
    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.inner.settings
    }

    /// Get the cached owner lookup.
    #[must_use]
    pub fn owner(&self) -> &OwnerService {
        &self.inner.owner
    }

    /// Per-IP limiter for public form submissions.
    #[must_use]
    pub fn form_limiter(&self) -> &DefaultKeyedRateLimiter<IpAddr> {
        &self.inner.form_limiter
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("secrets", &self.inner.secrets.is_some())
            .field("deployments", &self.inner.deployments.is_some())
            .finish_non_exhaustive()
    }
}
