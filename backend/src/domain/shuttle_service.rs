//! Shuttle resource service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::persistence_errors::map_shuttle_repository_error;
use super::ports::{ShuttleFleet, ShuttleRepository};
use super::validation::empty_update;
use super::{
    Error, Operation, Principal, ResourceKind, Shuttle, ShuttleDraft, ShuttleId, WriteMode,
    authorize,
};

/// [`ShuttleFleet`] backed by a [`ShuttleRepository`].
#[derive(Clone)]
pub struct ShuttleService {
    shuttles: Arc<dyn ShuttleRepository>,
}

impl ShuttleService {
    /// Wrap a repository.
    pub fn new(shuttles: Arc<dyn ShuttleRepository>) -> Self {
        Self { shuttles }
    }

    async fn load(&self, id: ShuttleId) -> Result<Shuttle, Error> {
        self.shuttles
            .find_by_id(id)
            .await
            .map_err(map_shuttle_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: ShuttleId) -> Error {
    Error::not_found(format!("shuttle {} not found", id.get()))
}

#[async_trait]
impl ShuttleFleet for ShuttleService {
    async fn list_shuttles(&self, principal: &Principal) -> Result<Vec<Shuttle>, Error> {
        authorize(principal, ResourceKind::Shuttle, Operation::List)?;
        self.shuttles.list().await.map_err(map_shuttle_repository_error)
    }

    async fn get_shuttle(&self, principal: &Principal, id: ShuttleId) -> Result<Shuttle, Error> {
        authorize(principal, ResourceKind::Shuttle, Operation::Retrieve)?;
        self.load(id).await
    }

    async fn create_shuttle(&self, principal: &Principal, draft: &ShuttleDraft) -> Result<Shuttle, Error> {
        authorize(principal, ResourceKind::Shuttle, Operation::Create)?;
        let name = draft.parse_name()?;
        let shuttle = self
            .shuttles
            .create(&name)
            .await
            .map_err(map_shuttle_repository_error)?;
        info!(shuttle_id = shuttle.id.get(), name = %shuttle.name, "shuttle created");
        Ok(shuttle)
    }

    async fn update_shuttle(
        &self,
        principal: &Principal,
        id: ShuttleId,
        draft: &ShuttleDraft,
        mode: WriteMode,
    ) -> Result<Shuttle, Error> {
        authorize(principal, ResourceKind::Shuttle, Operation::Update)?;
        self.load(id).await?;
        if mode == WriteMode::Merge && draft.is_empty() {
            return Err(empty_update());
        }
        let name = draft.parse_name()?;
        let shuttle = self
            .shuttles
            .rename(id, &name)
            .await
            .map_err(map_shuttle_repository_error)?
            .ok_or_else(|| not_found(id))?;
        info!(shuttle_id = id.get(), ?mode, "shuttle updated");
        Ok(shuttle)
    }

    async fn delete_shuttle(&self, principal: &Principal, id: ShuttleId) -> Result<(), Error> {
        authorize(principal, ResourceKind::Shuttle, Operation::Delete)?;
        if !self
            .shuttles
            .delete(id)
            .await
            .map_err(map_shuttle_repository_error)?
        {
            return Err(not_found(id));
        }
        info!(shuttle_id = id.get(), "shuttle deleted");
        Ok(())
    }
}
