//! Customer and admin notifications.
//!
//! Every send is fire-and-forget: the message is rendered on the request
//! path, delivered on a spawned task, and failures are only logged. Nothing
//! is sent while `emailNotificationsEnabled` is off.

use std::sync::Arc;

use zenzebra_core::{InquiryStatus, SystemSettings, render_template};

use super::email::{Mailer, OutgoingEmail};
use crate::models::{Inquiry, PartnerRequest};

/// Sends the emails triggered by form submissions and admin actions.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Confirmation to the customer after a contact form submission.
    pub fn inquiry_received(&self, settings: &SystemSettings, inquiry: &Inquiry) {
        let vars = [
            ("name", inquiry.name.as_str()),
            ("query", inquiry.query.as_str()),
        ];
        self.send_notification(
            settings,
            &inquiry.email,
            &render_template(&settings.inquiry_confirmation_subject, &vars),
            &render_template(&settings.inquiry_confirmation_template, &vars),
        );
    }

    /// Status update to the customer after an admin moves an inquiry.
    pub fn inquiry_status_changed(&self, settings: &SystemSettings, inquiry: &Inquiry) {
        let status = status_label(inquiry.status);
        let vars = [("name", inquiry.name.as_str()), ("status", status.as_str())];
        self.send_notification(
            settings,
            &inquiry.email,
            &render_template(&settings.inquiry_status_update_subject, &vars),
            &render_template(&settings.inquiry_status_update_template, &vars),
        );
    }

    /// Confirmation to the requester after a partner form submission.
    pub fn partner_request_received(&self, settings: &SystemSettings, request: &PartnerRequest) {
        let body = format!(
            "Hello {},\n\nThank you for your interest in partnering with {}. Your request has \
             been submitted successfully for {}.\n\nOur partnerships team will review your \
             details and get back to you shortly.\n\nBest regards,\n{} Team",
            request.name, settings.site_name, request.company_name, settings.site_name
        );
        self.send_notification(
            settings,
            &request.email,
            &format!("{} - Partner Request Submitted", settings.site_name),
            &body,
        );
    }

    /// Sent once a partner request reaches `onboarded`.
    pub fn partner_onboarded(&self, settings: &SystemSettings, request: &PartnerRequest) {
        let body = format!(
            "Hello {},\n\nWe are excited to inform you that your partner request for {} has \
             been shifted to onboarded.\n\nWe hope you have a long and prosperous journey with \
             us!\n\nBest regards,\n{} Team",
            request.name, request.company_name, settings.site_name
        );
        self.send_notification(
            settings,
            &request.email,
            &format!("{} - Partner Request Onboarded", settings.site_name),
            &body,
        );
    }

    /// Welcome email for a newly created admin.
    pub fn admin_welcome(&self, settings: &SystemSettings, to: &str, name: &str, login_url: &str) {
        if !settings.email_notifications_enabled {
            tracing::debug!(to = %to, "Email notifications disabled, skipping welcome email");
            return;
        }
        match OutgoingEmail::welcome(
            to,
            name,
            &settings.site_name,
            login_url,
            &settings.support_email,
        ) {
            Ok(email) => self.dispatch(email),
            Err(e) => tracing::warn!(error = %e, "Failed to render welcome email"),
        }
    }

    fn send_notification(&self, settings: &SystemSettings, to: &str, subject: &str, body: &str) {
        if !settings.email_notifications_enabled {
            tracing::debug!(to = %to, subject = %subject, "Email notifications disabled, skipping");
            return;
        }
        match OutgoingEmail::notification(to, &settings.site_name, subject, body) {
            Ok(email) => self.dispatch(email),
            Err(e) => tracing::warn!(error = %e, subject = %subject, "Failed to render email"),
        }
    }

    fn dispatch(&self, email: OutgoingEmail) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&email).await {
                tracing::warn!(
                    error = %e,
                    to = %email.to,
                    subject = %email.subject,
                    "Failed to send notification email"
                );
            }
        });
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}

/// Status as shown to customers: stored underscores read as spaces.
fn status_label(status: InquiryStatus) -> String {
    status.as_str().replace('_', " ")
}
