//! Owner-submitted admin account forms.

use secrecy::SecretString;
use serde::Deserialize;

use super::form::{self, FieldErrors};
use crate::services::NewAdmin;

/// Shortest password accepted for admin accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// `POST /api/admin/users` body.
#[derive(Deserialize)]
pub struct CreateAdminForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CreateAdminForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(self) -> Result<NewAdmin, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = form::required(&mut errors, "name", &self.name);
        let email = form::email(&mut errors, &self.email);
        check_password(&mut errors, "password", &self.password);

        match email {
            Some(email) if errors.is_empty() => Ok(NewAdmin {
                name,
                email,
                password: SecretString::from(self.password),
            }),
            _ => Err(errors),
        }
    }
}

impl std::fmt::Debug for CreateAdminForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAdminForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Record a failure unless `password` is long enough.
pub fn check_password(errors: &mut FieldErrors, field: &str, password: &str) {
    if password.is_empty() {
        errors.add(field, "is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            field,
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn form(name: &str, email: &str, password: &str) -> CreateAdminForm {
        CreateAdminForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let admin = form(" Ravi ", "Ravi@ZenZebra.in", "s3cure-pass")
            .validate()
            .unwrap();
        assert_eq!(admin.name, "Ravi");
        assert_eq!(admin.email.as_str(), "ravi@zenzebra.in");
        assert_eq!(admin.password.expose_secret(), "s3cure-pass");
    }

    #[test]
    fn test_collects_every_failure() {
        let errors = form("", "nope", "short").validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("is required"));
        assert!(errors.get("email").is_some());
        assert_eq!(errors.get("password"), Some("must be at least 8 characters"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", form("a", "a@b.co", "hunter2hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
