//! Driven port for mail transport.

use async_trait::async_trait;

use crate::domain::OutgoingEmail;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum MailerError {
        /// The relay could not be reached; the attempt may be retried.
        Transport { message: String } => "mail transport failed: {message}",
        /// The relay refused the message.
        Rejected { status: u16, message: String } => "mail relay rejected message ({status}): {message}",
    }
}

/// Sends a single email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email` or report why it could not be delivered.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}
