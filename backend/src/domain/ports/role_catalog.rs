//! Driven port exposing the stored role catalogue.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading the role catalogue.
    pub enum RoleCatalogError {
        /// The store could not be reached.
        Connection { message: String } => "role catalogue connection failed: {message}",
        /// The query failed.
        Query { message: String } => "role catalogue query failed: {message}",
    }
}

/// Read access to the names of roles defined in storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleCatalog: Send + Sync {
    /// Every role name present in the catalogue.
    async fn role_names(&self) -> Result<Vec<String>, RoleCatalogError>;
}
