//! Mail transports implementing [`crate::domain::ports::Mailer`].

mod http_relay;
mod log_mailer;

pub use http_relay::HttpMailRelay;
pub use log_mailer::LoggingMailer;
