//! Outgoing email.
//!
//! Messages are rendered with Askama into a plain text part and an HTML part
//! and delivered over SMTP via lettre. Delivery sits behind the [`Mailer`]
//! trait so request handlers never depend on a live SMTP server.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for plain notifications.
#[derive(Template)]
#[template(path = "email/notification.html")]
struct NotificationEmailHtml<'a> {
    subject: &'a str,
    site_name: &'a str,
    paragraphs: Vec<&'a str>,
}

/// Plain text template for plain notifications.
#[derive(Template)]
#[template(path = "email/notification.txt")]
struct NotificationEmailText<'a> {
    site_name: &'a str,
    body: &'a str,
}

/// HTML template for the new admin welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    name: &'a str,
    site_name: &'a str,
    login_url: &'a str,
    support_email: &'a str,
}

/// Plain text template for the new admin welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    name: &'a str,
    site_name: &'a str,
    login_url: &'a str,
    support_email: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OutgoingEmail {
    /// A notification whose body is plain text. Blank lines separate
    /// paragraphs in the HTML part.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render.
    pub fn notification(
        to: &str,
        site_name: &str,
        subject: &str,
        body: &str,
    ) -> Result<Self, EmailError> {
        let paragraphs = body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        let html = NotificationEmailHtml {
            subject,
            site_name,
            paragraphs,
        }
        .render()?;
        let text = NotificationEmailText { site_name, body }.render()?;

        Ok(Self {
            to: to.to_string(),
            subject: subject.to_string(),
            text,
            html,
        })
    }

    /// Welcome email for a newly created admin. Never carries the password.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render.
    pub fn welcome(
        to: &str,
        name: &str,
        site_name: &str,
        login_url: &str,
        support_email: &str,
    ) -> Result<Self, EmailError> {
        let html = WelcomeEmailHtml {
            name,
            site_name,
            login_url,
            support_email,
        }
        .render()?;
        let text = WelcomeEmailText {
            name,
            site_name,
            login_url,
            support_email,
        }
        .render()?;

        Ok(Self {
            to: to.to_string(),
            subject: format!("Welcome to the {site_name} admin panel"),
            text,
            html,
        })
    }
}

/// Delivers rendered email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// SMTP delivery.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(email.to.clone()))?)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html.clone()),
                    ),
            )?;

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_splits_paragraphs() {
        let email = OutgoingEmail::notification(
            "asha@example.com",
            "ZenZebra",
            "Hello",
            "Hello Asha,\n\nLine one\nLine two\n\nBest regards",
        )
        .unwrap();

        assert_eq!(email.subject, "Hello");
        assert!(email.text.starts_with("Hello Asha,\n\nLine one\nLine two"));
        assert!(email.html.contains("Line one<br>Line two"));
        assert!(email.html.contains("Best regards"));
    }

    #[test]
    fn test_notification_escapes_html() {
        let email =
            OutgoingEmail::notification("a@b.co", "ZenZebra", "Hi", "<script>x</script>").unwrap();
        assert!(!email.html.contains("<script>"));
        assert!(email.text.contains("<script>"));
    }

    #[test]
    fn test_welcome_has_login_link() {
        let email = OutgoingEmail::welcome(
            "new@zenzebra.in",
            "Ravi",
            "ZenZebra",
            "https://zenzebra.in/admin/login",
            "support@zenzebra.in",
        )
        .unwrap();

        assert_eq!(email.subject, "Welcome to the ZenZebra admin panel");
        assert!(email.text.contains("https://zenzebra.in/admin/login"));
        assert!(email.html.contains("Welcome, Ravi"));
        assert!(email.text.contains("Welcome, Ravi"));
        assert!(email.text.contains("multi-factor"));
    }
}
