//! Contact form inquiries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zenzebra_core::{Email, InquiryId, InquiryStatus, PhoneNumber, StatusWorkflow};

use super::form::{self, FieldErrors};
use crate::db::{Document, RepositoryError};

/// A stored inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub phone: u64,
    pub query: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Document> for Inquiry {
    type Error = RepositoryError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let status = doc.str_field("status")?.parse::<InquiryStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("inquiry {}: {e}", doc.id))
        })?;

        Ok(Self {
            name: doc.str_field("name")?.to_string(),
            email: doc.str_field("email")?.to_string(),
            phone: doc.u64_field("phone")?,
            query: doc.str_field("query")?.to_string(),
            status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            id: InquiryId::new(doc.id),
        })
    }
}

/// Raw contact form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Value,
    #[serde(default)]
    pub query: String,
}

/// A validated inquiry ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInquiry {
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub query: String,
}

impl ContactForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the failing fields with a message each.
    pub fn validate(&self) -> Result<NewInquiry, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = form::required(&mut errors, "name", &self.name);
        let email = form::email(&mut errors, &self.email);
        let phone = form::phone(&mut errors, &self.phone);
        let query = form::required(&mut errors, "query", &self.query);

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(NewInquiry {
                name,
                email,
                phone,
                query,
            }),
            _ => Err(errors),
        }
    }
}

impl NewInquiry {
    /// Stored fields, starting in the initial workflow status.
    #[must_use]
    pub fn into_data(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("name".to_string(), Value::from(self.name));
        data.insert("email".to_string(), Value::from(self.email.into_inner()));
        data.insert("phone".to_string(), Value::from(self.phone.as_u64()));
        data.insert("query".to_string(), Value::from(self.query));
        data.insert(
            "status".to_string(),
            Value::from(InquiryStatus::INITIAL.as_str()),
        );
        data
    }
}
