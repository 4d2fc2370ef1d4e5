//! Reqwest-backed mail relay.
//!
//! Messages are posted as JSON to a single relay endpoint, which owns SMTP
//! delivery. Any 2xx response counts as accepted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::OutgoingEmail;
use crate::domain::ports::{Mailer, MailerError};

#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl<'a> From<&'a OutgoingEmail> for RelayPayload<'a> {
    fn from(email: &'a OutgoingEmail) -> Self {
        Self {
            from: email.sender.as_str(),
            to: email.recipient.as_str(),
            subject: email.subject.as_str(),
            text: email.body.as_str(),
        }
    }
}

/// Mailer that hands messages to an HTTP relay.
pub struct HttpMailRelay {
    client: Client,
    endpoint: Url,
}

impl HttpMailRelay {
    /// Build a relay client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&RelayPayload::from(email))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> MailerError {
    MailerError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailerError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut message: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("no response body").to_owned();
    }
    MailerError::rejected(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use zeroize::Zeroizing;

    #[test]
    fn payload_carries_every_header_and_the_body() {
        let email = OutgoingEmail {
            sender: "fleet@umd.edu".into(),
            recipient: "driver@umd.edu".into(),
            subject: "Welcome".into(),
            body: Zeroizing::new("Hello".into()),
        };
        let json = serde_json::to_value(RelayPayload::from(&email)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "from": "fleet@umd.edu",
                "to": "driver@umd.edu",
                "subject": "Welcome",
                "text": "Hello",
            })
        );
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, b"bad   recipient\n".as_slice(), "bad recipient")]
    #[case(StatusCode::BAD_GATEWAY, b"".as_slice(), "Bad Gateway")]
    fn non_success_statuses_are_rejections(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(
            map_status_error(status, body),
            MailerError::rejected(status.as_u16(), expected)
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let MailerError::Rejected { message, .. } = map_status_error(StatusCode::FORBIDDEN, body.as_bytes())
        else {
            panic!("expected rejection");
        };
        assert_eq!(message.len(), 160);
    }
}
