//! Mailer that only logs, for development without a relay.

use async_trait::async_trait;
use tracing::info;

use crate::domain::OutgoingEmail;
use crate::domain::ports::{Mailer, MailerError};

/// Records that a message would have been sent. The body is never logged
/// because credential emails carry a plaintext password.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        info!(recipient = %email.recipient, subject = %email.subject, "mail relay not configured; email logged only");
        Ok(())
    }
}
