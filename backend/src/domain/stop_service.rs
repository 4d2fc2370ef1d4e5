//! Stop resource service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::persistence_errors::map_stop_repository_error;
use super::ports::{StopCatalog, StopRepository};
use super::validation::empty_update;
use super::{Error, Operation, Principal, ResourceKind, Stop, StopDraft, StopId, WriteMode, authorize};

/// [`StopCatalog`] backed by a [`StopRepository`].
#[derive(Clone)]
pub struct StopService {
    stops: Arc<dyn StopRepository>,
}

impl StopService {
    /// Wrap a repository.
    pub fn new(stops: Arc<dyn StopRepository>) -> Self {
        Self { stops }
    }

    async fn load(&self, id: StopId) -> Result<Stop, Error> {
        self.stops
            .find_by_id(id)
            .await
            .map_err(map_stop_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: StopId) -> Error {
    Error::not_found(format!("stop {} not found", id.get()))
}

#[async_trait]
impl StopCatalog for StopService {
    async fn list_stops(&self, principal: &Principal) -> Result<Vec<Stop>, Error> {
        authorize(principal, ResourceKind::Stop, Operation::List)?;
        self.stops.list().await.map_err(map_stop_repository_error)
    }

    async fn get_stop(&self, principal: &Principal, id: StopId) -> Result<Stop, Error> {
        authorize(principal, ResourceKind::Stop, Operation::Retrieve)?;
        self.load(id).await
    }

    async fn create_stop(&self, principal: &Principal, draft: &StopDraft) -> Result<Stop, Error> {
        authorize(principal, ResourceKind::Stop, Operation::Create)?;
        let new_stop = draft.parse_new()?;
        let stop = self
            .stops
            .create(&new_stop.name, &new_stop.abbr)
            .await
            .map_err(map_stop_repository_error)?;
        info!(stop_id = stop.id.get(), abbr = %stop.abbr, "stop created");
        Ok(stop)
    }

    async fn update_stop(
        &self,
        principal: &Principal,
        id: StopId,
        draft: &StopDraft,
        mode: WriteMode,
    ) -> Result<Stop, Error> {
        authorize(principal, ResourceKind::Stop, Operation::Update)?;
        self.load(id).await?;
        if mode == WriteMode::Merge && draft.is_empty() {
            return Err(empty_update());
        }
        let fields = draft.parse(mode)?;
        let stop = self
            .stops
            .update(id, &fields)
            .await
            .map_err(map_stop_repository_error)?
            .ok_or_else(|| not_found(id))?;
        info!(stop_id = id.get(), ?mode, "stop updated");
        Ok(stop)
    }

    async fn delete_stop(&self, principal: &Principal, id: StopId) -> Result<(), Error> {
        authorize(principal, ResourceKind::Stop, Operation::Delete)?;
        let removed = self
            .stops
            .delete(id)
            .await
            .map_err(map_stop_repository_error)?;
        if !removed {
            return Err(not_found(id));
        }
        info!(stop_id = id.get(), "stop deleted");
        Ok(())
    }
}
