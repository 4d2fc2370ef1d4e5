//! Named roles granted to accounts.
//!
//! The set of roles is closed: the persistence layer stores role names, and
//! startup checks that every variant here has a matching catalogue row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Error;
use super::ports::RoleCatalog;

/// Role granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Shuttle driver. Every provisioned account receives this role.
    Driver,
}

impl Role {
    /// Every role the service knows about.
    pub const ALL: [Self; 1] = [Self::Driver];

    /// Catalogue name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "Driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored role name has no [`Role`] variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Confirm that the catalogue defines every [`Role`].
///
/// Provisioning assigns [`Role::Driver`] unconditionally, so a missing row
/// would only surface on the first account creation. Checking at startup
/// turns that into a boot failure instead.
pub async fn verify_role_catalog(catalog: &dyn RoleCatalog) -> Result<(), Error> {
    let known = catalog
        .role_names()
        .await
        .map_err(|err| Error::service_unavailable(format!("role catalogue unavailable: {err}")))?;
    let missing: Vec<&str> = Role::ALL
        .iter()
        .map(|role| role.as_str())
        .filter(|name| !known.iter().any(|known| known == name))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::internal(format!(
            "role catalogue is missing: {}",
            missing.join(", ")
        )))
    }
}
