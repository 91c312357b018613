//! Cached system settings.
//!
//! Settings are read on nearly every request (kill switches, email
//! templates), so the merged view is cached for a short TTL and dropped
//! whenever an owner writes.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Map, Value};
use zenzebra_core::{SystemSettings, stringify_value};

use crate::db::{DocumentStore, RepositoryError, SettingsRepository};

/// Settings with a read-through cache.
#[derive(Clone)]
pub struct SettingsService {
    inner: Arc<SettingsServiceInner>,
}

struct SettingsServiceInner {
    store: Arc<dyn DocumentStore>,
    collection: String,
    cache: Cache<(), Arc<SystemSettings>>,
}

impl SettingsService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner: Arc::new(SettingsServiceInner {
                store,
                collection: collection.into(),
                cache,
            }),
        }
    }

    fn repository(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(self.inner.store.as_ref(), &self.inner.collection)
    }

    /// Effective settings.
    ///
    /// Never fails: when the backend cannot be read the defaults are returned
    /// (and not cached), so kill switches read as off.
    pub async fn current(&self) -> Arc<SystemSettings> {
        if let Some(settings) = self.inner.cache.get(&()).await {
            return settings;
        }

        match self.repository().load().await {
            Ok(settings) => {
                let settings = Arc::new(settings);
                self.inner.cache.insert((), Arc::clone(&settings)).await;
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                Arc::new(SystemSettings::default())
            }
        }
    }

    /// Apply a partial update and return the new effective settings.
    ///
    /// Values are stored in string form. Unknown keys and values that cannot
    /// be stored (`null`, arrays, objects) are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a write or the reload fails.
    pub async fn update(
        &self,
        changes: &Map<String, Value>,
    ) -> Result<SystemSettings, RepositoryError> {
        let pairs: Vec<(String, String)> = changes
            .iter()
            .filter_map(|(key, value)| stringify_value(value).map(|v| (key.clone(), v)))
            .collect();

        let repository = self.repository();
        let written = repository.save(&pairs).await;
        self.invalidate().await;
        let written = written?;
        tracing::info!(keys = ?written, "Settings updated");

        repository.load().await
    }

    /// Drop the cached settings.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(&()).await;
    }
}

impl std::fmt::Debug for SettingsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService")
            .field("collection", &self.inner.collection)
            .finish_non_exhaustive()
    }
}
