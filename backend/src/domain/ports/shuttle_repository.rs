//! Driven port for shuttle persistence.

use async_trait::async_trait;

use crate::domain::{Shuttle, ShuttleId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by shuttle repository adapters.
    pub enum ShuttleRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "shuttle repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "shuttle repository query failed: {message}",
        /// The name is already taken.
        Duplicate { field: String } => "a shuttle with this {field} already exists",
    }
}

/// Shuttle storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShuttleRepository: Send + Sync {
    /// All shuttles ordered by id.
    async fn list(&self) -> Result<Vec<Shuttle>, ShuttleRepositoryError>;

    /// Fetch one shuttle.
    async fn find_by_id(&self, id: ShuttleId) -> Result<Option<Shuttle>, ShuttleRepositoryError>;

    /// Insert a shuttle.
    async fn create(&self, name: &str) -> Result<Shuttle, ShuttleRepositoryError>;

    /// Rename a shuttle; `Ok(None)` when it does not exist.
    async fn rename(&self, id: ShuttleId, name: &str) -> Result<Option<Shuttle>, ShuttleRepositoryError>;

    /// Remove a shuttle; `Ok(false)` when it did not exist.
    async fn delete(&self, id: ShuttleId) -> Result<bool, ShuttleRepositoryError>;
}
