//! Driving port for the shuttle resource.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Shuttle, ShuttleDraft, ShuttleId, WriteMode};

/// Shuttle use-cases, each guarded by the access gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShuttleFleet: Send + Sync {
    /// Every shuttle.
    async fn list_shuttles(&self, principal: &Principal) -> Result<Vec<Shuttle>, Error>;

    /// One shuttle by id.
    async fn get_shuttle(&self, principal: &Principal, id: ShuttleId) -> Result<Shuttle, Error>;

    /// Create a shuttle.
    async fn create_shuttle(&self, principal: &Principal, draft: &ShuttleDraft) -> Result<Shuttle, Error>;

    /// Replace or patch a shuttle.
    async fn update_shuttle(
        &self,
        principal: &Principal,
        id: ShuttleId,
        draft: &ShuttleDraft,
        mode: WriteMode,
    ) -> Result<Shuttle, Error>;

    /// Delete a shuttle.
    async fn delete_shuttle(&self, principal: &Principal, id: ShuttleId) -> Result<(), Error>;
}
