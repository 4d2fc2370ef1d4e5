//! Driver account provisioning.
//!
//! An administrator supplies a profile; the service generates a one-time
//! password, stores only its hash, grants the `Driver` role and queues an
//! email carrying the credentials. Queueing is best effort: the account is
//! created even when the outbox write fails.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::persistence_errors::{map_account_repository_error, map_hasher_error};
use super::ports::{AccountRepository, CredentialHasher, NotificationOutbox};
use super::validation::FieldViolation;
use super::{
    AccountDraft, AccountProfile, Error, GeneratedPassword, NewAccount, Operation, Principal,
    ResourceKind, Role, UserAccount, authorize, credential_email,
};

/// Creates driver accounts.
#[derive(Clone)]
pub struct AccountProvisioner {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
    outbox: Arc<dyn NotificationOutbox>,
    sender: String,
}

impl AccountProvisioner {
    /// Build a provisioner sending credential mail from `sender`.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn CredentialHasher>,
        outbox: Arc<dyn NotificationOutbox>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            outbox,
            sender: sender.into(),
        }
    }

    /// Provision a driver account for `draft`.
    ///
    /// Checks run in this order: administrator privilege (403), field
    /// validation (400), email then username uniqueness (400). Nothing is
    /// stored or queued when any check fails.
    pub async fn provision(&self, principal: &Principal, draft: &AccountDraft) -> Result<UserAccount, Error> {
        authorize(principal, ResourceKind::User, Operation::Create)?;
        let profile = draft.parse_profile()?;
        self.ensure_unique(&profile).await?;

        let password = GeneratedPassword::generate();
        let password_hash = self
            .hasher
            .hash(password.expose())
            .await
            .map_err(|err| map_hasher_error(&err))?;

        let AccountProfile {
            username,
            email,
            first_name,
            last_name,
        } = profile;
        let account = self
            .accounts
            .create(&NewAccount {
                username,
                email,
                first_name,
                last_name,
                password_hash,
                roles: vec![Role::Driver],
                is_admin: false,
            })
            .await
            .map_err(map_account_repository_error)?;

        self.queue_credentials(&account, &password).await;
        info!(
            account_id = %account.id,
            username = %account.username,
            provisioned_by = ?principal.account_id().map(|id| id.get()),
            "driver account provisioned"
        );
        Ok(account)
    }

    async fn ensure_unique(&self, profile: &AccountProfile) -> Result<(), Error> {
        let email_taken = self
            .accounts
            .email_in_use(&profile.email.normalized(), None)
            .await
            .map_err(map_account_repository_error)?;
        if email_taken {
            return Err(FieldViolation::duplicate("email").into());
        }
        let username_taken = self
            .accounts
            .username_in_use(profile.username.as_str(), None)
            .await
            .map_err(map_account_repository_error)?;
        if username_taken {
            return Err(FieldViolation::duplicate("username").into());
        }
        Ok(())
    }

    async fn queue_credentials(&self, account: &UserAccount, password: &GeneratedPassword) {
        let email = credential_email(&self.sender, account, password);
        match self.outbox.enqueue(&email).await {
            Ok(message_id) => debug!(
                account_id = %account.id,
                %message_id,
                "credential email queued"
            ),
            Err(error) => warn!(
                account_id = %account.id,
                %error,
                "failed to queue credential email; account was still created"
            ),
        }
    }
}
