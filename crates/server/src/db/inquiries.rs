//! Inquiry repository.

use serde_json::{Map, Value};
use zenzebra_core::{InquiryId, InquiryStatus};

use super::{DocumentStore, ListQuery, RepositoryError, new_document_id};
use crate::models::{Inquiry, NewInquiry};

/// Repository for contact form inquiries.
pub struct InquiryRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: &'a str,
}

impl<'a> InquiryRepository<'a> {
    /// Create a new inquiry repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self { store, collection }
    }

    /// List one page of inquiries, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the listing fails.
    /// Returns `RepositoryError::DataCorruption` if a document is malformed.
    pub async fn list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<Inquiry>, u64), RepositoryError> {
        let query = ListQuery::newest_first().limit(limit).offset(offset);
        let page = self.store.list(self.collection, &query).await?;

        let inquiries = page
            .documents
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((inquiries, page.total))
    }

    /// Get an inquiry by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such inquiry.
    pub async fn get(&self, id: &InquiryId) -> Result<Inquiry, RepositoryError> {
        self.store.get(self.collection, id.as_str()).await?.try_into()
    }

    /// Store a new inquiry in its initial status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Backend` if the write fails.
    pub async fn create(&self, inquiry: NewInquiry) -> Result<Inquiry, RepositoryError> {
        self.store
            .create(self.collection, &new_document_id(), inquiry.into_data())
            .await?
            .try_into()
    }

    /// Overwrite the status of an inquiry.
    ///
    /// Callers check the workflow first; this write is unconditional.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if there is no such inquiry.
    pub async fn set_status(
        &self,
        id: &InquiryId,
        status: InquiryStatus,
    ) -> Result<Inquiry, RepositoryError> {
        let mut data = Map::new();
        data.insert("status".to_string(), Value::from(status.as_str()));
        self.store
            .update(self.collection, id.as_str(), data)
            .await?
            .try_into()
    }
}
