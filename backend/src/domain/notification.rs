//! Outgoing email and the durable outbox record that carries it.

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{GeneratedPassword, UserAccount};

/// Subject line of the credential email.
pub const CREDENTIAL_EMAIL_SUBJECT: &str = "Account created for the Shatoru App";
/// Sender used when no other address is configured.
pub const DEFAULT_SENDER: &str = "shatoru.umd@gmail.com";
/// Stored in place of a body once the message leaves the pending state.
pub const REDACTED_BODY: &str = "[removed after the final delivery attempt]";

/// A plain-text email ready for a mail transport.
///
/// The body may contain a one-time password, so it is zeroed on drop and
/// omitted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Envelope sender.
    pub sender: String,
    /// Single recipient.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: Zeroizing<String>,
}

impl std::fmt::Debug for OutgoingEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutgoingEmail")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Compose the email announcing a freshly provisioned account.
///
/// # Examples
/// ```
/// # use chrono::Utc;
/// # use shuttle_backend::domain::*;
/// let account = UserAccount {
///     id: AccountId::new(7),
///     username: Username::parse("jdoe").unwrap(),
///     email: EmailAddress::parse("jdoe@umd.edu").unwrap(),
///     first_name: PersonName::parse("first_name", "Jane").unwrap(),
///     last_name: PersonName::parse("last_name", "Doe").unwrap(),
///     roles: vec![Role::Driver],
///     is_admin: false,
///     is_active: true,
///     created_at: Utc::now(),
/// };
/// let password = GeneratedPassword::generate();
/// let email = credential_email(DEFAULT_SENDER, &account, &password);
/// assert_eq!(email.recipient, "jdoe@umd.edu");
/// assert!(email.body.contains(password.expose()));
/// ```
#[must_use]
pub fn credential_email(sender: &str, account: &UserAccount, password: &GeneratedPassword) -> OutgoingEmail {
    let body = format!(
        "Your Shatoru account has been successfully created by the Admin.\n\n\
         Your login credentials are as stated below:\n\
         Username: {username}\n\
         Password: {password}\n\n\
         Please reset your password on your first login.\n",
        username = account.username,
        password = password.expose(),
    );
    OutgoingEmail {
        sender: sender.to_owned(),
        recipient: account.email.as_str().to_owned(),
        subject: CREDENTIAL_EMAIL_SUBJECT.to_owned(),
        body: Zeroizing::new(body),
    }
}

/// Surrogate key of an outbox record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutboxMessageId(i64);

impl OutboxMessageId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for OutboxMessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A pending email claimed from the outbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    /// Record key.
    pub id: OutboxMessageId,
    /// The email itself.
    pub email: OutgoingEmail,
    /// Delivery attempts made so far.
    pub attempts: u32,
    /// Error text from the previous attempt.
    pub last_error: Option<String>,
    /// When the message was enqueued.
    pub created_at: DateTime<Utc>,
    /// Earliest time of the next attempt.
    pub next_attempt_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, EmailAddress, PersonName, Role, Username};
    use rstest::rstest;

    fn account() -> UserAccount {
        UserAccount {
            id: AccountId::new(3),
            username: Username::parse("driver3").expect("username"),
            email: EmailAddress::parse("driver3@umd.edu").expect("email"),
            first_name: PersonName::parse("first_name", "Sam").expect("first"),
            last_name: PersonName::parse("last_name", "Lee").expect("last"),
            roles: vec![Role::Driver],
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn body_lists_credentials_and_reset_instruction() {
        let password = GeneratedPassword::generate();
        let email = credential_email(DEFAULT_SENDER, &account(), &password);
        assert_eq!(email.subject, CREDENTIAL_EMAIL_SUBJECT);
        assert_eq!(email.sender, DEFAULT_SENDER);
        assert!(email.body.contains("Username: driver3\n"));
        assert!(email.body.contains(&format!("Password: {}\n", password.expose())));
        assert!(email.body.ends_with("Please reset your password on your first login.\n"));
    }

    #[rstest]
    fn debug_output_omits_the_body() {
        let password = GeneratedPassword::generate();
        let email = credential_email(DEFAULT_SENDER, &account(), &password);
        assert!(!format!("{email:?}").contains(password.expose()));
    }
}
