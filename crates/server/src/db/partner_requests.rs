//! Partner request repository.

use serde_json::{Map, Value};
use zenzebra_core::{PartnerRequestId, PartnerRequestStatus};

use super::{DocumentStore, ListQuery, RepositoryError, new_document_id};
use crate::models::{NewPartnerRequest, PartnerRequest};

/// Repository for partnership requests.
pub struct PartnerRequestRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> PartnerRequestRepository<'a> {
    /// Create a new partner request repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// List one page of partner requests, newest first.
    ///
    /// Returns the page together with the total number of requests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the listing fails.
    /// Returns `RepositoryError::DataCorruption` if a document is malformed.
    pub async fn list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<PartnerRequest>, u64), RepositoryError> {
        let query = ListQuery::newest_first().limit(limit).offset(offset);
        let page = self.store.list(self.collection, &query).await?;

        let requests = page
            .documents
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((requests, page.total))
    }

    /// Get a partner request by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such request.
    pub async fn get(&self, id: &PartnerRequestId) -> Result<PartnerRequest, RepositoryError> {
        self.store.get(self.collection, id.as_str()).await?.try_into()
    }

    /// Store a new partner request in its initial status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the write fails.
    pub async fn create(
        &self,
        request: NewPartnerRequest,
    ) -> Result<PartnerRequest, RepositoryError> {
        self.store
            .create(self.collection, &new_document_id(), request.into_data())
            .await?
            .try_into()
    }

    /// Overwrite the status of a partner request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such request.
    pub async fn set_status(
        &self,
        id: &PartnerRequestId,
        status: PartnerRequestStatus,
    ) -> Result<PartnerRequest, RepositoryError> {
        let mut data = Map::new();
        data.insert("status".to_string(), Value::from(status.as_str()));
        self.store
            .update(self.collection, id.as_str(), data)
            .await?
            .try_into()
    }
}
