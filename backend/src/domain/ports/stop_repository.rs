//! Driven port for stop persistence.

use async_trait::async_trait;

use crate::domain::{Stop, StopFields, StopId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by stop repository adapters.
    pub enum StopRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "stop repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "stop repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { field: String } => "a stop with this {field} already exists",
    }
}

/// Stop storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StopRepository: Send + Sync {
    /// All stops ordered by id.
    async fn list(&self) -> Result<Vec<Stop>, StopRepositoryError>;

    /// Fetch one stop.
    async fn find_by_id(&self, id: StopId) -> Result<Option<Stop>, StopRepositoryError>;

    /// Insert a stop; both fields must be present.
    async fn create(&self, name: &str, abbr: &str) -> Result<Stop, StopRepositoryError>;

    /// Apply field changes; `Ok(None)` when the stop does not exist.
    async fn update(&self, id: StopId, fields: &StopFields) -> Result<Option<Stop>, StopRepositoryError>;

    /// Remove a stop; `Ok(false)` when it did not exist.
    async fn delete(&self, id: StopId) -> Result<bool, StopRepositoryError>;
}
