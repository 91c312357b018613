//! Admin account commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the owner on a fresh project
//! zz-cli admin bootstrap -e owner@zenzebra.in -n "Owner Name" -p '<password>'
//!
//! # List admins
//! zz-cli admin list
//! ```
//!
//! # Environment Variables
//!
//! - `APPWRITE_ENDPOINT`, `APPWRITE_PROJECT_ID`, `APPWRITE_API_KEY`,
//!   `APPWRITE_DATABASE_ID` - Backend access

use thiserror::Error;
use zenzebra_core::OwnerResolver;
use zenzebra_server::appwrite::{AppwriteClient, AppwriteError};
use zenzebra_server::config::{AppwriteConfig, ConfigError};
use zenzebra_server::models::{CreateAdminForm, FieldErrors};
use zenzebra_server::services::{IdentityError, IdentityStore, provision_admin};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Backend configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend client could not be built.
    #[error("Backend client error: {0}")]
    Client(#[from] AppwriteError),

    /// Identity backend call failed.
    #[error("Identity backend error: {0}")]
    Identity(#[from] IdentityError),

    /// Input failed validation.
    #[error("Invalid input: {0}")]
    Invalid(FieldErrors),

    /// Admins already exist, so the owner is already set.
    #[error("{0} admin account(s) already exist; the owner is {1}")]
    AlreadyBootstrapped(usize, String),
}

fn client() -> Result<AppwriteClient, AdminError> {
    dotenvy::dotenv().ok();
    let config = AppwriteConfig::from_env()?;
    Ok(AppwriteClient::new(&config)?)
}

/// Create the owner account.
///
/// The owner is the earliest registered admin, so this only runs against a
/// project with no admins. Like every new admin, the account has a verified
/// email and must reset its password and enable MFA on first sign-in.
pub async fn bootstrap(email: &str, name: &str, password: String) -> Result<(), AdminError> {
    let new_admin = CreateAdminForm {
        name: name.to_string(),
        email: email.to_string(),
        password,
    }
    .validate()
    .map_err(AdminError::Invalid)?;

    let identity = client()?;

    let existing = identity.list_principals().await?;
    if !existing.is_empty() {
        let count = existing.len();
        let owner = OwnerResolver::new(existing)
            .owner()
            .map(|p| p.email.clone())
            .unwrap_or_default();
        return Err(AdminError::AlreadyBootstrapped(count, owner));
    }

    tracing::info!("Creating owner account: {}", new_admin.email);
    let principal = provision_admin(&identity, &new_admin).await?;

    tracing::info!(
        "Owner created successfully! ID: {}, Email: {}",
        principal.id,
        principal.email
    );
    tracing::warn!("A password reset and MFA setup are required on first sign-in.");

    Ok(())
}

/// List admin accounts by registration, owner first.
pub async fn list() -> Result<(), AdminError> {
    let identity = client()?;
    let resolver = OwnerResolver::new(identity.list_principals().await?);

    if resolver.ordered().is_empty() {
        tracing::info!("No admin accounts. Run 'zz-cli admin bootstrap' to create the owner.");
        return Ok(());
    }

    for (i, principal) in resolver.ordered().iter().enumerate() {
        let role = if i == 0 { "owner" } else { "admin" };
        let status = if principal.active { "active" } else { "blocked" };
        tracing::info!(
            "{} <{}> [{role}, {status}, gate: {:?}] registered {} (id {})",
            principal.name,
            principal.email,
            principal.gate(),
            principal.registered_at.format("%Y-%m-%d"),
            principal.id,
        );
    }

    Ok(())
}
