//! Driving port for the stop resource.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Stop, StopDraft, StopId, WriteMode};

/// Stop use-cases, each guarded by the access gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StopCatalog: Send + Sync {
    /// Every stop.
    async fn list_stops(&self, principal: &Principal) -> Result<Vec<Stop>, Error>;

    /// One stop by id.
    async fn get_stop(&self, principal: &Principal, id: StopId) -> Result<Stop, Error>;

    /// Create a stop.
    async fn create_stop(&self, principal: &Principal, draft: &StopDraft) -> Result<Stop, Error>;

    /// Replace or patch a stop.
    async fn update_stop(
        &self,
        principal: &Principal,
        id: StopId,
        draft: &StopDraft,
        mode: WriteMode,
    ) -> Result<Stop, Error>;

    /// Delete a stop.
    async fn delete_stop(&self, principal: &Principal, id: StopId) -> Result<(), Error>;
}
