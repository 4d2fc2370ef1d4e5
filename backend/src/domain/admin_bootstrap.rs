//! Startup creation of the first administrator account.
//!
//! Provisioning requires an administrator, so a fresh deployment needs one
//! seeded from configuration. Seeding is idempotent: an existing account
//! with the configured username is left untouched.

use tracing::info;
use zeroize::Zeroizing;

use super::persistence_errors::{map_account_repository_error, map_hasher_error};
use super::ports::{AccountRepository, CredentialHasher};
use super::{AccountDraft, AccountId, Error, NewAccount};

/// Administrator credentials read from configuration.
#[derive(Clone)]
pub struct AdminSeed {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

impl AdminSeed {
    /// Capture the configured values; validation happens in [`ensure_admin`].
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// What [`ensure_admin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A new administrator was stored.
    Created(AccountId),
    /// An account with the username already existed.
    AlreadyPresent,
}

/// Create the seeded administrator unless the username is already taken.
pub async fn ensure_admin(
    accounts: &dyn AccountRepository,
    hasher: &dyn CredentialHasher,
    seed: &AdminSeed,
) -> Result<BootstrapOutcome, Error> {
    if seed.password.trim().is_empty() {
        return Err(Error::invalid_request("admin password must not be empty"));
    }
    let profile = AccountDraft {
        username: Some(seed.username.clone()),
        email: Some(seed.email.clone()),
        first_name: Some("Shuttle".to_owned()),
        last_name: Some("Administrator".to_owned()),
    }
    .parse_profile()?;

    let exists = accounts
        .username_in_use(profile.username.as_str(), None)
        .await
        .map_err(map_account_repository_error)?;
    if exists {
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let password_hash = hasher
        .hash(seed.password.as_str())
        .await
        .map_err(|err| map_hasher_error(&err))?;
    let account = accounts
        .create(&NewAccount {
            username: profile.username,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            password_hash,
            roles: Vec::new(),
            is_admin: true,
        })
        .await
        .map_err(map_account_repository_error)?;
    info!(account_id = %account.id, username = %account.username, "bootstrap administrator created");
    Ok(BootstrapOutcome::Created(account.id))
}
