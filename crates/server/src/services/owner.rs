//! Owner resolution.
//!
//! The owner is the admin with the earliest registration. Resolving it means
//! listing every account, so the id is cached briefly and invalidated when
//! accounts are created or deleted.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use zenzebra_core::{AdminId, OwnerResolver};

use super::identity::{IdentityError, IdentityStore};

/// Cached owner lookups.
#[derive(Clone)]
pub struct OwnerService {
    identity: Arc<dyn IdentityStore>,
    cache: Cache<(), AdminId>,
}

impl OwnerService {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityStore>, ttl: Duration) -> Self {
        Self {
            identity,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Every admin, ordered by registration.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the accounts cannot be listed.
    pub async fn resolver(&self) -> Result<OwnerResolver, IdentityError> {
        let principals = self.identity.list_principals().await?;
        let resolver = OwnerResolver::new(principals);
        if let Some(owner) = resolver.owner() {
            self.cache.insert((), owner.id.clone()).await;
        }
        Ok(resolver)
    }

    /// The owner's id, or `None` when no admin exists.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the accounts cannot be listed.
    pub async fn owner_id(&self) -> Result<Option<AdminId>, IdentityError> {
        if let Some(id) = self.cache.get(&()).await {
            return Ok(Some(id));
        }
        let resolver = self.resolver().await?;
        Ok(resolver.owner().map(|owner| owner.id.clone()))
    }

    /// Whether `id` is the owner. Callers must treat an error as "not owner".
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the accounts cannot be listed.
    pub async fn is_owner(&self, id: &AdminId) -> Result<bool, IdentityError> {
        Ok(self.owner_id().await?.as_ref() == Some(id))
    }

    /// Drop the cached owner id.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}

impl std::fmt::Debug for OwnerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerService").finish_non_exhaustive()
    }
}
