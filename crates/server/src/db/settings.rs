//! Settings repository.
//!
//! Each setting is one `{key, value}` document. Values are always strings.

use std::collections::HashMap;

use serde_json::{Map, Value};
use zenzebra_core::SystemSettings;

use super::{DocumentStore, ListQuery, RepositoryError, new_document_id};

/// Comfortably above the number of known keys.
const LIST_LIMIT: u32 = 100;

/// Repository for the key/value settings collection.
pub struct SettingsRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// Load every stored setting merged over the defaults.
    ///
    /// Documents with unknown keys or without a string value are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the listing fails.
    pub async fn load(&self) -> Result<SystemSettings, RepositoryError> {
        let stored = self.stored().await?;
        Ok(SystemSettings::from_pairs(
            stored.iter().map(|(key, (_, value))| (key.as_str(), value.as_str())),
        ))
    }

    /// Write the given key/value pairs, updating existing documents and
    /// creating missing ones. Unknown keys are skipped.
    ///
    /// Returns the keys that were written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` on the first failed write. Earlier
    /// writes are not rolled back.
    pub async fn save(
        &self,
        pairs: &[(String, String)],
    ) -> Result<Vec<String>, RepositoryError> {
        let stored = self.stored().await?;
        let mut written = Vec::new();

        for (key, value) in pairs {
            if !SystemSettings::is_known_key(key) {
                tracing::debug!(key = %key, "Skipping unknown settings key");
                continue;
            }

            if let Some((id, _)) = stored.get(key) {
                let mut data = Map::new();
                data.insert("value".to_string(), Value::from(value.as_str()));
                self.store.update(self.collection, id, data).await?;
            } else {
                let mut data = Map::new();
                data.insert("key".to_string(), Value::from(key.as_str()));
                data.insert("value".to_string(), Value::from(value.as_str()));
                self.store
                    .create(self.collection, &new_document_id(), data)
                    .await?;
            }
            written.push(key.clone());
        }

        Ok(written)
    }

    /// Stored settings as `key -> (document id, value)`.
    async fn stored(&self) -> Result<HashMap<String, (String, String)>, RepositoryError> {
        let page = self
            .store
            .list(self.collection, &ListQuery::default().limit(LIST_LIMIT))
            .await?;

        Ok(page
            .documents
            .into_iter()
            .filter_map(|doc| {
                let key = doc.opt_str_field("key")?.to_string();
                let value = doc
                    .data
                    .get("value")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Some((key, (doc.id, value)))
            })
            .collect())
    }
}
