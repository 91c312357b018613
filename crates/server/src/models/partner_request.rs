//! Partnership requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zenzebra_core::{Email, PartnerRequestId, PartnerRequestStatus, PhoneNumber, StatusWorkflow};

use super::form::{self, FieldErrors};
use crate::db::{Document, RepositoryError};

/// A stored partner request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequest {
    pub id: PartnerRequestId,
    pub name: String,
    pub email: String,
    pub phone: u64,
    pub company_name: String,
    pub company_website: Option<String>,
    pub remarks: Option<String>,
    pub status: PartnerRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Document> for PartnerRequest {
    type Error = RepositoryError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        // Requests submitted before the status attribute existed have none.
        let status = match doc.opt_str_field("status") {
            Some(raw) => raw.parse::<PartnerRequestStatus>().map_err(|e| {
                RepositoryError::DataCorruption(format!("partner request {}: {e}", doc.id))
            })?,
            None => PartnerRequestStatus::INITIAL,
        };

        Ok(Self {
            name: doc.str_field("name")?.to_string(),
            email: doc.str_field("email")?.to_string(),
            phone: doc.u64_field("phone")?,
            company_name: doc.str_field("companyName")?.to_string(),
            company_website: doc.opt_str_field("companyWebsite").map(str::to_string),
            remarks: doc.opt_str_field("remarks").map(str::to_string),
            status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            id: PartnerRequestId::new(doc.id),
        })
    }
}

/// Raw partner request form body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequestForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Value,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// A validated partner request ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartnerRequest {
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub company_name: String,
    pub company_website: Option<String>,
    pub remarks: Option<String>,
}

impl PartnerRequestForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the failing fields with a message each.
    pub fn validate(&self) -> Result<NewPartnerRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = form::required(&mut errors, "name", &self.name);
        let email = form::email(&mut errors, &self.email);
        let phone = form::phone(&mut errors, &self.phone);
        let company_name = form::required(&mut errors, "companyName", &self.company_name);

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(NewPartnerRequest {
                name,
                email,
                phone,
                company_name,
                company_website: form::optional(self.company_website.as_deref()),
                remarks: form::optional(self.remarks.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}

impl NewPartnerRequest {
    /// Stored fields, starting in the initial workflow status. Blank optional
    /// fields are left out.
    #[must_use]
    pub fn into_data(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("name".to_string(), Value::from(self.name));
        data.insert("email".to_string(), Value::from(self.email.into_inner()));
        data.insert("phone".to_string(), Value::from(self.phone.as_u64()));
        data.insert("companyName".to_string(), Value::from(self.company_name));
        if let Some(website) = self.company_website {
            data.insert("companyWebsite".to_string(), Value::from(website));
        }
        if let Some(remarks) = self.remarks {
            data.insert("remarks".to_string(), Value::from(remarks));
        }
        data.insert(
            "status".to_string(),
            Value::from(PartnerRequestStatus::INITIAL.as_str()),
        );
        data
    }
}
