//! Driving port for the user (driver account) resource.

use async_trait::async_trait;

use crate::domain::{AccountDraft, AccountId, Error, Principal, UserAccount, WriteMode};

/// User account use-cases, each guarded by the access gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverAccounts: Send + Sync {
    /// Provision a driver account and queue its credential email.
    async fn create_driver(&self, principal: &Principal, draft: &AccountDraft) -> Result<UserAccount, Error>;

    /// Every account.
    async fn list_accounts(&self, principal: &Principal) -> Result<Vec<UserAccount>, Error>;

    /// One account by id.
    async fn get_account(&self, principal: &Principal, id: AccountId) -> Result<UserAccount, Error>;

    /// Replace or patch an account's profile fields.
    async fn update_account(
        &self,
        principal: &Principal,
        id: AccountId,
        draft: &AccountDraft,
        mode: WriteMode,
    ) -> Result<UserAccount, Error>;

    /// Always rejected: accounts are never deleted through the API.
    async fn delete_account(&self, principal: &Principal, id: AccountId) -> Result<(), Error>;

    /// The caller's own account; anonymous callers are unauthorized.
    async fn current_account(&self, principal: &Principal) -> Result<UserAccount, Error>;
}
