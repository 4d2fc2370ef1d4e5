//! In-memory account store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::ports::{AccountLogin, AccountRepository, AccountRepositoryError};
use crate::domain::{AccountChanges, AccountId, NewAccount, PasswordHash, UserAccount};

#[derive(Debug)]
struct StoredAccount {
    account: UserAccount,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct AccountTable {
    last_id: i64,
    rows: BTreeMap<AccountId, StoredAccount>,
}

impl AccountTable {
    fn email_taken(&self, normalized: &str, except: Option<AccountId>) -> bool {
        self.rows
            .values()
            .any(|row| Some(row.account.id) != except && row.account.email.normalized() == normalized)
    }

    fn username_taken(&self, username: &str, except: Option<AccountId>) -> bool {
        self.rows
            .values()
            .any(|row| Some(row.account.id) != except && row.account.username.as_str() == username)
    }
}

/// Account repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    table: RwLock<AccountTable>,
}

impl InMemoryAccountRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn list(&self) -> Result<Vec<UserAccount>, AccountRepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.values().map(|row| row.account.clone()).collect())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).map(|row| row.account.clone()))
    }

    async fn find_login(&self, username: &str) -> Result<Option<AccountLogin>, AccountRepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|row| row.account.username.as_str() == username)
            .map(|row| AccountLogin {
                account: row.account.clone(),
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn email_in_use(
        &self,
        normalized_email: &str,
        except: Option<AccountId>,
    ) -> Result<bool, AccountRepositoryError> {
        Ok(self.table.read().await.email_taken(normalized_email, except))
    }

    async fn username_in_use(
        &self,
        username: &str,
        except: Option<AccountId>,
    ) -> Result<bool, AccountRepositoryError> {
        Ok(self.table.read().await.username_taken(username, except))
    }

    async fn create(&self, account: &NewAccount) -> Result<UserAccount, AccountRepositoryError> {
        let mut table = self.table.write().await;
        if table.username_taken(account.username.as_str(), None) {
            return Err(AccountRepositoryError::duplicate("username"));
        }
        if table.email_taken(&account.email.normalized(), None) {
            return Err(AccountRepositoryError::duplicate("email"));
        }
        table.last_id += 1;
        let id = AccountId::new(table.last_id);
        let mut roles = account.roles.clone();
        roles.sort();
        roles.dedup();
        let stored = UserAccount {
            id,
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            roles,
            is_admin: account.is_admin,
            is_active: true,
            created_at: Utc::now(),
        };
        table.rows.insert(
            id,
            StoredAccount {
                account: stored.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(stored)
    }

    async fn update(
        &self,
        id: AccountId,
        changes: &AccountChanges,
    ) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(username) = &changes.username {
            if table.username_taken(username.as_str(), Some(id)) {
                return Err(AccountRepositoryError::duplicate("username"));
            }
        }
        if let Some(email) = &changes.email {
            if table.email_taken(&email.normalized(), Some(id)) {
                return Err(AccountRepositoryError::duplicate("email"));
            }
        }
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.account = changes.apply_to(&row.account);
        Ok(Some(row.account.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, PersonName, Role, Username};
    use rstest::rstest;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: Username::parse(username).expect("username"),
            email: EmailAddress::parse(email).expect("email"),
            first_name: PersonName::parse("first_name", "A").expect("first"),
            last_name: PersonName::parse("last_name", "B").expect("last"),
            password_hash: PasswordHash::new("phc"),
            roles: vec![Role::Driver, Role::Driver],
            is_admin: false,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_sequential_and_roles_deduplicated() {
        let repo = InMemoryAccountRepository::new();
        let first = repo.create(&new_account("a", "a@umd.edu")).await.expect("first");
        let second = repo.create(&new_account("b", "b@umd.edu")).await.expect("second");
        assert_eq!((first.id.get(), second.id.get()), (1, 2));
        assert_eq!(first.roles, vec![Role::Driver]);
    }

    #[rstest]
    #[tokio::test]
    async fn email_uniqueness_ignores_case() {
        let repo = InMemoryAccountRepository::new();
        repo.create(&new_account("a", "Driver@umd.edu")).await.expect("first");
        let err = repo
            .create(&new_account("b", "driver@UMD.EDU"))
            .await
            .expect_err("duplicate email");
        assert_eq!(err, AccountRepositoryError::duplicate("email"));
        assert!(repo.email_in_use("driver@umd.edu", None).await.expect("query"));
        assert_eq!(repo.count().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_may_keep_own_email() {
        let repo = InMemoryAccountRepository::new();
        let account = repo.create(&new_account("a", "a@umd.edu")).await.expect("create");
        let changes = AccountChanges {
            email: Some(EmailAddress::parse("A@umd.edu").expect("email")),
            ..AccountChanges::default()
        };
        let updated = repo
            .update(account.id, &changes)
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.email.as_str(), "A@umd.edu");
        assert!(repo.update(AccountId::new(99), &changes).await.expect("update").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_rows_are_reported_before_uniqueness() {
        let repo = InMemoryAccountRepository::new();
        repo.create(&new_account("a", "a@umd.edu")).await.expect("create");
        let changes = AccountChanges {
            username: Some(Username::parse("a").expect("username")),
            email: Some(EmailAddress::parse("a@umd.edu").expect("email")),
            ..AccountChanges::default()
        };
        let outcome = repo.update(AccountId::new(99), &changes).await.expect("update");
        assert!(outcome.is_none());
    }
}
