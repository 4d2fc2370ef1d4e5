//! Static role catalogue.

use async_trait::async_trait;

use crate::domain::Role;
use crate::domain::ports::{RoleCatalog, RoleCatalogError};

/// Role catalogue holding a fixed list of names.
#[derive(Debug, Clone)]
pub struct InMemoryRoleCatalog {
    names: Vec<String>,
}

impl InMemoryRoleCatalog {
    /// Catalogue with exactly the given names.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for InMemoryRoleCatalog {
    /// Catalogue seeded with every known [`Role`].
    fn default() -> Self {
        Self::with_names(Role::ALL.iter().map(|role| role.as_str()))
    }
}

#[async_trait]
impl RoleCatalog for InMemoryRoleCatalog {
    async fn role_names(&self) -> Result<Vec<String>, RoleCatalogError> {
        Ok(self.names.clone())
    }
}
