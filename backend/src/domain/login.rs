//! Password login and session principal resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::persistence_errors::{map_account_repository_error, map_hasher_error};
use super::ports::{AccountRepository, CredentialHasher, LoginService};
use super::{AccountId, Error, LoginCredentials, Principal, UserAccount};

/// [`LoginService`] checking passwords against stored hashes.
#[derive(Clone)]
pub struct AccountLoginService {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountLoginService {
    /// Build the service.
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { accounts, hasher }
    }
}

fn rejected() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl LoginService for AccountLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserAccount, Error> {
        let Some(login) = self
            .accounts
            .find_login(credentials.username())
            .await
            .map_err(map_account_repository_error)?
        else {
            debug!("login rejected: unknown username");
            return Err(rejected());
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &login.password_hash)
            .await
            .map_err(|err| map_hasher_error(&err))?;
        if !matches || !login.account.is_active {
            debug!(account_id = %login.account.id, "login rejected");
            return Err(rejected());
        }
        info!(account_id = %login.account.id, "login succeeded");
        Ok(login.account)
    }

    async fn resolve_principal(&self, id: AccountId) -> Result<Principal, Error> {
        let account = self
            .accounts
            .find_by_id(id)
            .await
            .map_err(map_account_repository_error)?;
        Ok(account.as_ref().map_or(Principal::Anonymous, Principal::for_account))
    }
}
