//! External services and cached lookups.

pub mod doppler;
pub mod email;
pub mod identity;
pub mod notifications;
pub mod owner;
pub mod settings;
pub mod vercel;

pub use doppler::{DopplerClient, DopplerError, SecretsManager};
pub use email::{EmailError, Mailer, OutgoingEmail, SmtpMailer};
pub use identity::{IdentityError, IdentityStore, NewAdmin, provision_admin};
pub use notifications::Notifier;
pub use owner::OwnerService;
pub use settings::SettingsService;
pub use vercel::{DeploymentPlatform, VercelClient, VercelError};
