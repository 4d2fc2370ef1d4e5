//! Driven port for account persistence.

use async_trait::async_trait;

use crate::domain::{AccountChanges, AccountId, NewAccount, PasswordHash, UserAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "account repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "account repository query failed: {message}",
        /// A unique constraint rejected the write; `field` names the column.
        Duplicate { field: String } => "an account with this {field} already exists",
    }
}

/// Stored credentials for one account, used only by the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLogin {
    /// The account.
    pub account: UserAccount,
    /// Stored PHC hash.
    pub password_hash: PasswordHash,
}

/// Account storage.
///
/// Email comparisons are case-insensitive; callers pass the normalised
/// form from [`crate::domain::EmailAddress::normalized`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All accounts ordered by id.
    async fn list(&self) -> Result<Vec<UserAccount>, AccountRepositoryError>;

    /// Fetch one account.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, AccountRepositoryError>;

    /// Fetch an account and its hash by exact username.
    async fn find_login(&self, username: &str) -> Result<Option<AccountLogin>, AccountRepositoryError>;

    /// Whether another account (other than `except`) holds this email.
    async fn email_in_use(
        &self,
        normalized_email: &str,
        except: Option<AccountId>,
    ) -> Result<bool, AccountRepositoryError>;

    /// Whether another account (other than `except`) holds this username.
    async fn username_in_use(
        &self,
        username: &str,
        except: Option<AccountId>,
    ) -> Result<bool, AccountRepositoryError>;

    /// Insert an account with its roles.
    async fn create(&self, account: &NewAccount) -> Result<UserAccount, AccountRepositoryError>;

    /// Apply profile changes; `Ok(None)` when the account does not exist.
    async fn update(
        &self,
        id: AccountId,
        changes: &AccountChanges,
    ) -> Result<Option<UserAccount>, AccountRepositoryError>;
}
