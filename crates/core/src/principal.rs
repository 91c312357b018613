//! Admin principals and the owner/admin distinction.
//!
//! There is no stored role. The account with the earliest registration is the
//! owner; every other account is a standard admin. Owner-only operations
//! (user management, secrets, deployments, settings writes) check membership
//! through [`OwnerResolver`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::AdminId;

/// Security preferences stored on an admin account.
///
/// Unknown preference keys are carried through untouched so that updating one
/// flag never drops preferences written by other clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPrefs {
    /// The admin must choose a new password before using the panel.
    #[serde(default)]
    pub must_reset_password: bool,
    /// The admin must enable MFA before using the panel.
    #[serde(default)]
    pub mfa_required: bool,
    /// Any other preferences on the account.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AdminPrefs {
    /// Preferences applied to every newly created admin.
    #[must_use]
    pub fn for_new_admin() -> Self {
        Self {
            must_reset_password: true,
            mfa_required: true,
            extra: Map::new(),
        }
    }
}

/// An authenticated admin account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPrincipal {
    /// Account identifier.
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// When the account was registered.
    pub registered_at: DateTime<Utc>,
    /// `false` when the account has been blocked.
    pub active: bool,
    /// Whether the account has MFA enabled.
    pub mfa_enabled: bool,
    /// Security preferences.
    pub prefs: AdminPrefs,
}

/// What an authenticated admin must do before the panel opens up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionGate {
    /// Nothing pending.
    Clear,
    /// A password reset is pending.
    PasswordResetRequired,
    /// MFA has to be set up.
    MfaSetupRequired,
}

impl AdminPrincipal {
    /// The pending step for this admin, password reset first.
    #[must_use]
    pub const fn gate(&self) -> SessionGate {
        if self.prefs.must_reset_password {
            SessionGate::PasswordResetRequired
        } else if self.prefs.mfa_required && !self.mfa_enabled {
            SessionGate::MfaSetupRequired
        } else {
            SessionGate::Clear
        }
    }
}

/// Total order of admins by registration time.
///
/// The first entry is the owner. Ties keep the input order, which is the
/// backend's default listing order.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use zenzebra_core::{AdminId, AdminPrefs, AdminPrincipal, OwnerResolver};
///
/// let admin = |id: &str, year: i32| AdminPrincipal {
///     id: AdminId::new(id),
///     name: id.to_string(),
///     email: format!("{id}@zenzebra.in"),
///     registered_at: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
///     active: true,
///     mfa_enabled: true,
///     prefs: AdminPrefs::default(),
/// };
///
/// let resolver = OwnerResolver::new(vec![admin("late", 2025), admin("early", 2023)]);
/// assert!(resolver.is_owner(&AdminId::new("early")));
/// assert!(!resolver.is_owner(&AdminId::new("late")));
/// ```
#[derive(Debug, Clone)]
pub struct OwnerResolver {
    ordered: Vec<AdminPrincipal>,
}

impl OwnerResolver {
    /// Order the given principals by registration time.
    #[must_use]
    pub fn new(mut principals: Vec<AdminPrincipal>) -> Self {
        // sort_by_key is stable
        principals.sort_by_key(|p| p.registered_at);
        Self {
            ordered: principals,
        }
    }

    /// The owner, or `None` when there are no admins at all.
    #[must_use]
    pub fn owner(&self) -> Option<&AdminPrincipal> {
        self.ordered.first()
    }

    /// Whether `id` belongs to the owner.
    #[must_use]
    pub fn is_owner(&self, id: &AdminId) -> bool {
        self.owner().is_some_and(|owner| &owner.id == id)
    }

    /// All principals, oldest first.
    #[must_use]
    pub fn ordered(&self) -> &[AdminPrincipal] {
        &self.ordered
    }

    /// Consume the resolver, returning principals oldest first.
    #[must_use]
    pub fn into_ordered(self) -> Vec<AdminPrincipal> {
        self.ordered
    }
}
