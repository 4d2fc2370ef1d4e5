//! Driving port for authentication and session principal resolution.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, LoginCredentials, Principal, UserAccount};

/// Authentication use-cases called by the HTTP adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and return the signed-in account.
    ///
    /// Unknown usernames, wrong passwords and inactive accounts all yield
    /// the same `unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserAccount, Error>;

    /// Resolve the account id stored in a session.
    ///
    /// Missing or inactive accounts resolve to [`Principal::Anonymous`], so
    /// privileges are always read from current storage.
    async fn resolve_principal(&self, id: AccountId) -> Result<Principal, Error>;
}
