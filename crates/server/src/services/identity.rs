//! Admin identity: sessions and account management.
//!
//! Every admin is an account in the identity backend. There is one client
//! interface, [`IdentityStore`], and one production implementation in
//! [`crate::appwrite`].

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use zenzebra_core::{AdminId, AdminPrefs, AdminPrincipal, Email};

/// Errors from the identity backend.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The session token is missing, malformed or expired.
    #[error("invalid or expired session")]
    InvalidSession,

    /// No account with that id.
    #[error("admin not found")]
    NotFound,

    /// An account with that email already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend refused the input (e.g. a weak password).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The backend failed or could not be reached.
    #[error("identity backend error: {0}")]
    Backend(String),
}

/// Input for creating an admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: Email,
    pub password: SecretString,
}

/// Admin accounts in the identity backend.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Resolve a session token to the admin it belongs to.
    async fn principal_for_session(&self, token: &str) -> Result<AdminPrincipal, IdentityError>;

    /// Every admin account, in the backend's default order.
    async fn list_principals(&self) -> Result<Vec<AdminPrincipal>, IdentityError>;

    async fn get_principal(&self, id: &AdminId) -> Result<AdminPrincipal, IdentityError>;

    async fn create_principal(&self, admin: &NewAdmin) -> Result<AdminPrincipal, IdentityError>;

    async fn delete_principal(&self, id: &AdminId) -> Result<(), IdentityError>;

    /// Block (`false`) or unblock (`true`) an account.
    async fn set_active(&self, id: &AdminId, active: bool)
    -> Result<AdminPrincipal, IdentityError>;

    /// Replace the account's preferences.
    async fn update_prefs(
        &self,
        id: &AdminId,
        prefs: &AdminPrefs,
    ) -> Result<AdminPrefs, IdentityError>;

    async fn update_password(
        &self,
        id: &AdminId,
        password: &SecretString,
    ) -> Result<(), IdentityError>;

    /// Mark the account's email as verified.
    async fn mark_email_verified(&self, id: &AdminId) -> Result<(), IdentityError>;
}

/// Create an admin account flagged for a password reset and MFA setup, with
/// a verified email.
///
/// The flags are written right after creation. If any later step fails the
/// account is deleted again, so no admin is left without its flags.
///
/// # Errors
///
/// Returns the error of the first step that failed.
pub async fn provision_admin(
    identity: &dyn IdentityStore,
    admin: &NewAdmin,
) -> Result<AdminPrincipal, IdentityError> {
    let principal = identity.create_principal(admin).await?;

    match flag_and_verify(identity, &principal).await {
        Ok(prefs) => Ok(AdminPrincipal { prefs, ..principal }),
        Err(e) => {
            tracing::error!(error = %e, admin_id = %principal.id, "Admin setup failed, removing account");
            if let Err(cleanup) = identity.delete_principal(&principal.id).await {
                tracing::error!(
                    error = %cleanup,
                    admin_id = %principal.id,
                    "Failed to remove partially created admin"
                );
            }
            Err(e)
        }
    }
}

async fn flag_and_verify(
    identity: &dyn IdentityStore,
    principal: &AdminPrincipal,
) -> Result<AdminPrefs, IdentityError> {
    let mut prefs = AdminPrefs::for_new_admin();
    prefs.extra.clone_from(&principal.prefs.extra);
    let prefs = identity.update_prefs(&principal.id, &prefs).await?;
    identity.mark_email_verified(&principal.id).await?;
    Ok(prefs)
}
