//! Request and domain models.

pub mod admin;
pub mod form;
pub mod inquiry;
pub mod partner_request;

pub use admin::{CreateAdminForm, check_password};
pub use form::FieldErrors;
pub use inquiry::{ContactForm, Inquiry, NewInquiry};
pub use partner_request::{NewPartnerRequest, PartnerRequest, PartnerRequestForm};
