//! Field-level validation for public form submissions.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use zenzebra_core::{Email, PhoneNumber};

/// Validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Single-field failure.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `Ok(value)` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field} {message}")?;
        }
        Ok(())
    }
}

/// Trimmed value of a required text field.
pub(crate) fn required(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "is required");
    }
    trimmed.to_string()
}

/// Trimmed value of an optional text field, `None` when blank.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn email(errors: &mut FieldErrors, value: &str) -> Option<Email> {
    if value.trim().is_empty() {
        errors.add("email", "is required");
        return None;
    }
    Email::parse(value)
        .map_err(|e| errors.add("email", e.to_string()))
        .ok()
}

/// Phones arrive as JSON strings or numbers.
pub(crate) fn phone(errors: &mut FieldErrors, value: &Value) -> Option<PhoneNumber> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        _ => {
            errors.add("phone", "must be a string or number");
            return None;
        }
    };
    if raw.trim().is_empty() {
        errors.add("phone", "is required");
        return None;
    }
    PhoneNumber::parse(&raw)
        .map_err(|e| errors.add("phone", e.to_string()))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("name", "is required");
        errors.add("name", "too long");
        assert_eq!(errors.get("name"), Some("is required"));
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "must be 10 digits");
        errors.add("email", "is invalid");
        assert_eq!(errors.to_string(), "email is invalid; phone must be 10 digits");
    }

    #[test]
    fn test_serializes_as_map() {
        let errors = FieldErrors::single("phone", "bad");
        assert_eq!(serde_json::to_value(&errors).unwrap(), json!({"phone": "bad"}));
    }

    #[test]
    fn test_phone_accepts_numbers_and_strings() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            phone(&mut errors, &json!(9_876_543_210_u64)).unwrap().as_u64(),
            9_876_543_210
        );
        assert_eq!(
            phone(&mut errors, &json!("98765 43210")).unwrap().as_u64(),
            9_876_543_210
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_phone_rejections() {
        for bad in [json!("123"), json!("12345678901"), json!("abcdefghij"), json!(true)] {
            let mut errors = FieldErrors::new();
            assert!(phone(&mut errors, &bad).is_none(), "{bad}");
            assert!(errors.get("phone").is_some());
        }
    }

    #[test]
    fn test_missing_phone_is_required() {
        let mut errors = FieldErrors::new();
        assert!(phone(&mut errors, &Value::Null).is_none());
        assert_eq!(errors.get("phone"), Some("is required"));
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(Some("   ")), None);
        assert_eq!(optional(Some(" x ")), Some("x".to_string()));
        assert_eq!(optional(None), None);
    }
}
