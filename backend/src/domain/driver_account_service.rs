//! User resource service behind the [`DriverAccounts`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::persistence_errors::map_account_repository_error;
use super::ports::{AccountRepository, DriverAccounts};
use super::validation::{FieldViolation, empty_update};
use super::{
    AccountChanges, AccountDraft, AccountId, AccountProvisioner, Error, Operation, Principal,
    ResourceKind, UserAccount, WriteMode, authorize,
};

/// Accounts service combining provisioning with the read/update operations.
#[derive(Clone)]
pub struct DriverAccountService {
    accounts: Arc<dyn AccountRepository>,
    provisioner: AccountProvisioner,
}

impl DriverAccountService {
    /// Build the service over an account repository and a provisioner.
    pub fn new(accounts: Arc<dyn AccountRepository>, provisioner: AccountProvisioner) -> Self {
        Self {
            accounts,
            provisioner,
        }
    }

    async fn load(&self, id: AccountId) -> Result<UserAccount, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn ensure_unique(&self, id: AccountId, changes: &AccountChanges) -> Result<(), Error> {
        if let Some(email) = &changes.email {
            let taken = self
                .accounts
                .email_in_use(&email.normalized(), Some(id))
                .await
                .map_err(map_account_repository_error)?;
            if taken {
                return Err(FieldViolation::duplicate("email").into());
            }
        }
        if let Some(username) = &changes.username {
            let taken = self
                .accounts
                .username_in_use(username.as_str(), Some(id))
                .await
                .map_err(map_account_repository_error)?;
            if taken {
                return Err(FieldViolation::duplicate("username").into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DriverAccounts for DriverAccountService {
    async fn create_driver(&self, principal: &Principal, draft: &AccountDraft) -> Result<UserAccount, Error> {
        self.provisioner.provision(principal, draft).await
    }

    async fn list_accounts(&self, principal: &Principal) -> Result<Vec<UserAccount>, Error> {
        authorize(principal, ResourceKind::User, Operation::List)?;
        self.accounts
            .list()
            .await
            .map_err(map_account_repository_error)
    }

    async fn get_account(&self, principal: &Principal, id: AccountId) -> Result<UserAccount, Error> {
        authorize(principal, ResourceKind::User, Operation::Retrieve)?;
        self.load(id).await
    }

    async fn update_account(
        &self,
        principal: &Principal,
        id: AccountId,
        draft: &AccountDraft,
        mode: WriteMode,
    ) -> Result<UserAccount, Error> {
        authorize(principal, ResourceKind::User, Operation::Update)?;
        self.load(id).await?;
        if mode == WriteMode::Merge && draft.is_empty() {
            return Err(empty_update());
        }
        let changes = draft.parse(mode)?;
        self.ensure_unique(id, &changes).await?;
        let updated = self
            .accounts
            .update(id, &changes)
            .await
            .map_err(map_account_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        info!(account_id = %id, ?mode, "user account updated");
        Ok(updated)
    }

    async fn delete_account(&self, principal: &Principal, _id: AccountId) -> Result<(), Error> {
        authorize(principal, ResourceKind::User, Operation::Delete)
    }

    async fn current_account(&self, principal: &Principal) -> Result<UserAccount, Error> {
        let id = principal
            .account_id()
            .ok_or_else(|| Error::unauthorized("login required"))?;
        self.load(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountRepository, MockCredentialHasher, MockNotificationOutbox};
    use crate::domain::{EmailAddress, ErrorCode, PersonName, Role, Username};
    use chrono::Utc;
    use rstest::rstest;

    const ADMIN: Principal = Principal::Account {
        id: AccountId::new(1),
        is_admin: true,
    };

    fn account(id: i64) -> UserAccount {
        UserAccount {
            id: AccountId::new(id),
            username: Username::parse("driver").expect("username"),
            email: EmailAddress::parse("driver@umd.edu").expect("email"),
            first_name: PersonName::parse("first_name", "Dee").expect("first"),
            last_name: PersonName::parse("last_name", "River").expect("last"),
            roles: vec![Role::Driver],
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockAccountRepository) -> DriverAccountService {
        let repo = Arc::new(repo);
        let provisioner = AccountProvisioner::new(
            repo.clone(),
            Arc::new(MockCredentialHasher::new()),
            Arc::new(MockNotificationOutbox::new()),
            "fleet@umd.edu",
        );
        DriverAccountService::new(repo, provisioner)
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_account_is_not_found_before_validation() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let draft = AccountDraft {
            email: Some("not-an-email".into()),
            ..AccountDraft::default()
        };
        let err = service(repo)
            .update_account(&ADMIN, AccountId::new(99), &draft, WriteMode::Merge)
            .await
            .expect_err("missing account");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(account(id.get()))));
        let err = service(repo)
            .update_account(&ADMIN, AccountId::new(5), &AccountDraft::default(), WriteMode::Merge)
            .await
            .expect_err("empty patch");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn email_held_by_another_account_is_rejected() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|id| Ok(Some(account(id.get()))));
        repo.expect_email_in_use()
            .withf(|email, except| email == "taken@umd.edu" && *except == Some(AccountId::new(5)))
            .returning(|_, _| Ok(true));
        repo.expect_update().never();
        let draft = AccountDraft {
            email: Some("Taken@UMD.edu".into()),
            ..AccountDraft::default()
        };
        let err = service(repo)
            .update_account(&ADMIN, AccountId::new(5), &draft, WriteMode::Merge)
            .await
            .expect_err("duplicate email");
        assert_eq!(err.details().expect("details")["field"], "email");
    }

    #[rstest]
    #[case(Principal::Anonymous)]
    #[case(ADMIN)]
    #[tokio::test]
    async fn delete_is_never_allowed(#[case] principal: Principal) {
        let err = service(MockAccountRepository::new())
            .delete_account(&principal, AccountId::new(1))
            .await
            .expect_err("deletion disabled");
        assert_eq!(err.code(), ErrorCode::MethodNotAllowed);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_callers_have_no_current_account() {
        let err = service(MockAccountRepository::new())
            .current_account(&Principal::Anonymous)
            .await
            .expect_err("anonymous");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
