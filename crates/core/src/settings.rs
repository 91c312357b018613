//! System settings stored as flat key/value documents.
//!
//! The backend keeps one document per key with a string `value`. Booleans are
//! stored as `"true"` / `"false"`; anything other than exactly `"true"` reads
//! as `false`. Keys that are missing fall back to the compiled-in defaults and
//! keys that are not recognized are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_ASSET_URL: &str = "https://fra.cloud.appwrite.io/v1/storage/buckets/698585f2000d68784efd/files/6985926d0013323cc0ca/view?project=698585dc0014c943f45e&mode=admin";

/// Effective system settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct SystemSettings {
    pub site_name: String,
    pub site_description: String,
    /// Public form submissions are refused while set.
    pub maintenance_mode: bool,
    pub maintenance_message: String,
    /// Every admin route is refused while set.
    pub admin_locked: bool,
    pub support_email: String,
    pub support_phone: String,
    pub google_analytics_id: String,
    pub social_instagram: String,
    #[serde(rename = "socialLinkedIn")]
    pub social_linked_in: String,
    pub logo_url: String,
    pub og_image_url: String,
    /// Master switch for every outgoing email.
    pub email_notifications_enabled: bool,
    pub inquiry_confirmation_subject: String,
    pub inquiry_confirmation_template: String,
    pub inquiry_status_update_subject: String,
    pub inquiry_status_update_template: String,
    pub analytics_chatbot_enabled: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            site_name: "ZenZebra".to_string(),
            site_description: "Curated Lifestyle Where You Already Are".to_string(),
            maintenance_mode: false,
            maintenance_message: "We're currently upgrading our systems to provide a better \
                                  experience. Please check back soon."
                .to_string(),
            admin_locked: false,
            support_email: "support@zenzebra.in".to_string(),
            support_phone: "+91-9910605187".to_string(),
            google_analytics_id: "G-GM4Q02DG8S".to_string(),
            social_instagram: "https://www.instagram.com/zenzebraindia/".to_string(),
            social_linked_in: "https://www.linkedin.com/company/zenzebraindia/".to_string(),
            logo_url: DEFAULT_ASSET_URL.to_string(),
            og_image_url: DEFAULT_ASSET_URL.to_string(),
            email_notifications_enabled: true,
            inquiry_confirmation_subject: "ZenZebra - Inquiry Received: {name}".to_string(),
            inquiry_confirmation_template: "Hello {name},\n\nThank you for reaching out to \
                                            ZenZebra. We have received your inquiry regarding: \
                                            {query}\n\nOur team will get back to you \
                                            shortly.\n\nBest regards,\nZenZebra Team"
                .to_string(),
            inquiry_status_update_subject: "ZenZebra - Inquiry Update: {status}".to_string(),
            inquiry_status_update_template: "Hello {name},\n\nYour inquiry status has been \
                                             updated to: {status}.\n\nThank you for choosing \
                                             ZenZebra!"
                .to_string(),
            analytics_chatbot_enabled: true,
        }
    }
}

impl SystemSettings {
    /// Every recognized key, in storage naming.
    pub const KEYS: [&'static str; 18] = [
        "siteName",
        "siteDescription",
        "maintenanceMode",
        "maintenanceMessage",
        "adminLocked",
        "supportEmail",
        "supportPhone",
        "googleAnalyticsId",
        "socialInstagram",
        "socialLinkedIn",
        "logoUrl",
        "ogImageUrl",
        "emailNotificationsEnabled",
        "inquiryConfirmationSubject",
        "inquiryConfirmationTemplate",
        "inquiryStatusUpdateSubject",
        "inquiryStatusUpdateTemplate",
        "analyticsChatbotEnabled",
    ];

    /// Whether `key` is a recognized settings key.
    #[must_use]
    pub fn is_known_key(key: &str) -> bool {
        Self::KEYS.contains(&key)
    }

    /// Build settings from stored pairs, starting from the defaults.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            settings.apply(key, value);
        }
        settings
    }

    /// Set one key from its stored string form.
    ///
    /// Returns `false` and changes nothing when the key is not recognized.
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        let flag = value == "true";
        match key {
            "siteName" => self.site_name = value.to_string(),
            "siteDescription" => self.site_description = value.to_string(),
            "maintenanceMode" => self.maintenance_mode = flag,
            "maintenanceMessage" => self.maintenance_message = value.to_string(),
            "adminLocked" => self.admin_locked = flag,
            "supportEmail" => self.support_email = value.to_string(),
            "supportPhone" => self.support_phone = value.to_string(),
            "googleAnalyticsId" => self.google_analytics_id = value.to_string(),
            "socialInstagram" => self.social_instagram = value.to_string(),
            "socialLinkedIn" => self.social_linked_in = value.to_string(),
            "logoUrl" => self.logo_url = value.to_string(),
            "ogImageUrl" => self.og_image_url = value.to_string(),
            "emailNotificationsEnabled" => self.email_notifications_enabled = flag,
            "inquiryConfirmationSubject" => self.inquiry_confirmation_subject = value.to_string(),
            "inquiryConfirmationTemplate" => {
                self.inquiry_confirmation_template = value.to_string();
            }
            "inquiryStatusUpdateSubject" => self.inquiry_status_update_subject = value.to_string(),
            "inquiryStatusUpdateTemplate" => {
                self.inquiry_status_update_template = value.to_string();
            }
            "analyticsChatbotEnabled" => self.analytics_chatbot_enabled = flag,
            _ => return false,
        }
        true
    }

    /// Stored string form of a key, or `None` for unknown keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let text = |s: &String| Some(s.clone());
        let flag = |b: bool| Some(if b { "true" } else { "false" }.to_string());
        match key {
            "siteName" => text(&self.site_name),
            "siteDescription" => text(&self.site_description),
            "maintenanceMode" => flag(self.maintenance_mode),
            "maintenanceMessage" => text(&self.maintenance_message),
            "adminLocked" => flag(self.admin_locked),
            "supportEmail" => text(&self.support_email),
            "supportPhone" => text(&self.support_phone),
            "googleAnalyticsId" => text(&self.google_analytics_id),
            "socialInstagram" => text(&self.social_instagram),
            "socialLinkedIn" => text(&self.social_linked_in),
            "logoUrl" => text(&self.logo_url),
            "ogImageUrl" => text(&self.og_image_url),
            "emailNotificationsEnabled" => flag(self.email_notifications_enabled),
            "inquiryConfirmationSubject" => text(&self.inquiry_confirmation_subject),
            "inquiryConfirmationTemplate" => text(&self.inquiry_confirmation_template),
            "inquiryStatusUpdateSubject" => text(&self.inquiry_status_update_subject),
            "inquiryStatusUpdateTemplate" => text(&self.inquiry_status_update_template),
            "analyticsChatbotEnabled" => flag(self.analytics_chatbot_enabled),
            _ => None,
        }
    }

    /// Every key with its stored string form.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

/// Convert a JSON value from a settings update into its stored string form.
///
/// Strings are kept as is, booleans become `"true"`/`"false"` and numbers use
/// their decimal form. `null`, arrays and objects are not storable.
#[must_use]
pub fn stringify_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Replace every `{key}` placeholder in `template` with its value.
///
/// Placeholders without a matching variable are left untouched.
///
/// ```
/// use zenzebra_core::render_template;
///
/// let out = render_template("Hello {name}, re: {query}", &[("name", "Asha"), ("query", "stall")]);
/// assert_eq!(out, "Hello Asha, re: stall");
/// ```
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}
