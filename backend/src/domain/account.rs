//! User accounts and their validated profile fields.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::Role;
use super::validation::{FieldViolation, ViolationCode, WriteMode, bounded_text};

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;
/// Maximum first/last name length in characters.
pub const PERSON_NAME_MAX: usize = 150;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;

/// Surrogate key of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(i64);

impl AccountId {
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

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static USERNAME_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn username_regex() -> Option<&'static Regex> {
    USERNAME_RE
        .get_or_init(|| Regex::new(r"^[\w.@+-]+$").ok())
        .as_ref()
}

/// Login name: letters, digits and `@ . + - _`, at most [`USERNAME_MAX`].
///
/// # Examples
/// ```
/// use shuttle_backend::domain::Username;
///
/// assert!(Username::parse("jdoe").is_ok());
/// assert!(Username::parse("j doe").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate a raw username.
    pub fn parse(raw: &str) -> Result<Self, FieldViolation> {
        let value = bounded_text("username", raw, USERNAME_MAX)?;
        match username_regex() {
            Some(re) if re.is_match(&value) => Ok(Self(value)),
            _ => Err(FieldViolation::new(
                "username",
                ViolationCode::InvalidFormat,
                "may contain only letters, numbers, and @/./+/-/_ characters",
            )),
        }
    }

    /// Borrow the username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address with a lower-cased domain.
///
/// Uniqueness is case-insensitive over the whole address; use
/// [`EmailAddress::normalized`] for comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate a raw address.
    pub fn parse(raw: &str) -> Result<Self, FieldViolation> {
        let value = bounded_text("email", raw, EMAIL_MAX)?;
        let invalid = || {
            FieldViolation::new("email", ViolationCode::InvalidFormat, "enter a valid email address")
        };
        if value.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (local, domain) = value.rsplit_once('@').ok_or_else(invalid)?;
        let domain_ok = domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
            && domain.contains('.');
        if local.is_empty() || local.contains('@') || !domain_ok {
            return Err(invalid());
        }
        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }

    /// Borrow the address as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully lower-cased form used for uniqueness checks.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First or last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a raw name for `field`.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, FieldViolation> {
        bounded_text(field, raw, PERSON_NAME_MAX).map(Self)
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored account as seen by the rest of the service.
///
/// The password hash never leaves the persistence adapters except through
/// [`super::ports::AccountLogin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Surrogate key.
    pub id: AccountId,
    /// Unique login name.
    pub username: Username,
    /// Unique (case-insensitive) address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Granted roles, sorted.
    pub roles: Vec<Role>,
    /// Administrators may perform every write on every resource.
    pub is_admin: bool,
    /// Inactive accounts cannot log in.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Whether the account holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Account to insert; the hash is computed before this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Login name.
    pub username: Username,
    /// Contact address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// PHC-format password hash.
    pub password_hash: super::PasswordHash,
    /// Roles granted at creation.
    pub roles: Vec<Role>,
    /// Administrator flag.
    pub is_admin: bool,
}

/// Raw, unvalidated profile fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountDraft {
    /// Requested username.
    pub username: Option<String>,
    /// Requested email.
    pub email: Option<String>,
    /// Requested given name.
    pub first_name: Option<String>,
    /// Requested family name.
    pub last_name: Option<String>,
}

impl AccountDraft {
    /// Whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }

    /// Validate a draft for a new account: every field is required.
    pub fn parse_profile(&self) -> Result<AccountProfile, FieldViolation> {
        let changes = self.parse(WriteMode::Replace)?;
        match changes {
            AccountChanges {
                username: Some(username),
                email: Some(email),
                first_name: Some(first_name),
                last_name: Some(last_name),
            } => Ok(AccountProfile {
                username,
                email,
                first_name,
                last_name,
            }),
            AccountChanges { username: None, .. } => Err(FieldViolation::required("username")),
            AccountChanges { email: None, .. } => Err(FieldViolation::required("email")),
            AccountChanges { first_name: None, .. } => Err(FieldViolation::required("first_name")),
            AccountChanges { last_name: None, .. } => Err(FieldViolation::required("last_name")),
        }
    }

    /// Validate the draft into a set of changes.
    ///
    /// Fields are checked in declaration order and the first violation wins.
    pub fn parse(&self, mode: WriteMode) -> Result<AccountChanges, FieldViolation> {
        let username = mode
            .demand("username", self.username.as_deref())?
            .map(Username::parse)
            .transpose()?;
        let email = mode
            .demand("email", self.email.as_deref())?
            .map(EmailAddress::parse)
            .transpose()?;
        let first_name = mode
            .demand("first_name", self.first_name.as_deref())?
            .map(|raw| PersonName::parse("first_name", raw))
            .transpose()?;
        let last_name = mode
            .demand("last_name", self.last_name.as_deref())?
            .map(|raw| PersonName::parse("last_name", raw))
            .transpose()?;
        Ok(AccountChanges {
            username,
            email,
            first_name,
            last_name,
        })
    }
}

/// Complete, validated profile for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    /// Login name.
    pub username: Username,
    /// Contact address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
}

/// Validated profile changes; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    /// New username.
    pub username: Option<Username>,
    /// New email.
    pub email: Option<EmailAddress>,
    /// New given name.
    pub first_name: Option<PersonName>,
    /// New family name.
    pub last_name: Option<PersonName>,
}

impl AccountChanges {
    /// Apply the changes to a copy of `account`.
    #[must_use]
    pub fn apply_to(&self, account: &UserAccount) -> UserAccount {
        let mut updated = account.clone();
        if let Some(username) = &self.username {
            updated.username = username.clone();
        }
        if let Some(email) = &self.email {
            updated.email = email.clone();
        }
        if let Some(first_name) = &self.first_name {
            updated.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            updated.last_name = last_name.clone();
        }
        updated
    }
}
