//! The caller on whose behalf a request runs.

use super::{AccountId, UserAccount};

/// Identity resolved from the request session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// No session, or the session refers to an account that no longer
    /// exists or was deactivated.
    Anonymous,
    /// A signed-in account.
    Account {
        /// Account identifier.
        id: AccountId,
        /// Administrator flag at resolution time.
        is_admin: bool,
    },
}

impl Principal {
    /// Principal for a loaded account; inactive accounts resolve to anonymous.
    #[must_use]
    pub fn for_account(account: &UserAccount) -> Self {
        if account.is_active {
            Self::Account {
                id: account.id,
                is_admin: account.is_admin,
            }
        } else {
            Self::Anonymous
        }
    }

    /// Whether the caller holds administrator rights.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Account { is_admin: true, .. })
    }

    /// Account id of a signed-in caller.
    #[must_use]
    pub const fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Account { id, .. } => Some(*id),
            Self::Anonymous => None,
        }
    }
}
