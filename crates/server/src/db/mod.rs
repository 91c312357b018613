//! Document storage for the form collections.
//!
//! # Collections
//!
//! - `inquiries` - Contact form submissions
//! - `partner_requests` - Partnership requests
//! - `settings` - One `{key, value}` document per system setting
//!
//! Storage goes through the [`DocumentStore`] trait. Production uses the REST
//! client in [`crate::appwrite`]; tests substitute an in-memory store.
//! Repositories wrap a store reference and convert raw documents into typed
//! models, reporting shape problems as [`RepositoryError::DataCorruption`].

pub mod inquiries;
pub mod partner_requests;
pub mod settings;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use inquiries::InquiryRepository;
pub use partner_requests::PartnerRequestRepository;
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The document backend failed or could not be reached.
    #[error("backend error: {0}")]
    Backend(String),

    /// Data in the backend is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Document id already taken.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// A stored document: system attributes plus the collection's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Collection fields. System attributes other than the three above also
    /// land here and are ignored by the repositories.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// A required string field.
    ///
    /// # Errors
    ///
    /// Returns `DataCorruption` if the field is missing or not a string.
    pub fn str_field(&self, field: &str) -> Result<&str, RepositoryError> {
        self.data
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| self.corrupt(field, "string"))
    }

    /// An optional string field. Empty strings read as absent.
    #[must_use]
    pub fn opt_str_field(&self, field: &str) -> Option<&str> {
        self.data
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// A required non-negative integer field.
    ///
    /// # Errors
    ///
    /// Returns `DataCorruption` if the field is missing or not an integer.
    pub fn u64_field(&self, field: &str) -> Result<u64, RepositoryError> {
        self.data
            .get(field)
            .and_then(Value::as_u64)
            .ok_or_else(|| self.corrupt(field, "integer"))
    }

    fn corrupt(&self, field: &str, expected: &str) -> RepositoryError {
        RepositoryError::DataCorruption(format!(
            "document {}: field `{field}` missing or not a {expected}",
            self.id
        ))
    }
}

/// One page of documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentList {
    /// Total matching documents, ignoring limit and offset.
    pub total: u64,
    pub documents: Vec<Document>,
}

/// Sort direction for [`ListQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Filter, order and paging for a collection listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Exact-match filters on collection fields.
    pub equal: Vec<(String, Value)>,
    /// Sort attribute and direction.
    pub order: Option<(String, Order)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListQuery {
    /// Newest documents first.
    #[must_use]
    pub fn newest_first() -> Self {
        Self {
            order: Some(("$createdAt".to_string(), Order::Desc)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn equal(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equal.push((field.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether `doc` passes the equality filters.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.equal
            .iter()
            .all(|(field, value)| doc.data.get(field) == Some(value))
    }
}

/// A document collection backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List documents of a collection.
    async fn list(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<DocumentList, RepositoryError>;

    /// Fetch one document. Missing documents are [`RepositoryError::NotFound`].
    async fn get(&self, collection: &str, id: &str) -> Result<Document, RepositoryError>;

    /// Create a document with the given id.
    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError>;

    /// Merge `data` into an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, RepositoryError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Generate a fresh document id.
#[must_use]
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Document {
        serde_json::from_value(json!({
            "$id": "abc",
            "$createdAt": "2025-03-01T10:00:00.000+00:00",
            "$updatedAt": "2025-03-02T10:00:00.000+00:00",
            "$collectionId": "inquiries",
            "name": "Asha",
            "phone": 9_876_543_210_u64,
            "remarks": ""
        }))
        .unwrap()
    }

    #[test]
    fn test_document_parses_system_attributes() {
        let doc = sample();
        assert_eq!(doc.id, "abc");
        assert!(doc.updated_at > doc.created_at);
        assert_eq!(doc.str_field("name").unwrap(), "Asha");
        assert_eq!(doc.u64_field("phone").unwrap(), 9_876_543_210);
    }

    #[test]
    fn test_missing_field_is_corruption() {
        let doc = sample();
        assert!(matches!(
            doc.str_field("email"),
            Err(RepositoryError::DataCorruption(_))
        ));
        assert!(matches!(
            doc.u64_field("name"),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_empty_optional_reads_as_absent() {
        let doc = sample();
        assert_eq!(doc.opt_str_field("remarks"), None);
        assert_eq!(doc.opt_str_field("name"), Some("Asha"));
    }

    #[test]
    fn test_query_matches() {
        let doc = sample();
        assert!(ListQuery::default().equal("name", "Asha").matches(&doc));
        assert!(!ListQuery::default().equal("name", "Ravi").matches(&doc));
    }

    #[test]
    fn test_document_ids_are_unique() {
        let a = new_document_id();
        let b = new_document_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }
}
