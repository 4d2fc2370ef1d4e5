//! In-memory shuttle store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ShuttleRepository, ShuttleRepositoryError};
use crate::domain::{Shuttle, ShuttleId};

#[derive(Debug, Default)]
struct ShuttleTable {
    last_id: i64,
    rows: BTreeMap<ShuttleId, Shuttle>,
}

impl ShuttleTable {
    fn name_taken(&self, name: &str, except: Option<ShuttleId>) -> bool {
        self.rows
            .values()
            .any(|shuttle| Some(shuttle.id) != except && shuttle.name == name)
    }
}

/// Shuttle repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryShuttleRepository {
    table: RwLock<ShuttleTable>,
}

impl InMemoryShuttleRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShuttleRepository for InMemoryShuttleRepository {
    async fn list(&self) -> Result<Vec<Shuttle>, ShuttleRepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ShuttleId) -> Result<Option<Shuttle>, ShuttleRepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Shuttle, ShuttleRepositoryError> {
        let mut table = self.table.write().await;
        if table.name_taken(name, None) {
            return Err(ShuttleRepositoryError::duplicate("name"));
        }
        table.last_id += 1;
        let shuttle = Shuttle {
            id: ShuttleId::new(table.last_id),
            name: name.to_owned(),
        };
        table.rows.insert(shuttle.id, shuttle.clone());
        Ok(shuttle)
    }

    async fn rename(&self, id: ShuttleId, name: &str) -> Result<Option<Shuttle>, ShuttleRepositoryError> {
        let mut table = self.table.write().await;
        if table.name_taken(name, Some(id)) {
            return Err(ShuttleRepositoryError::duplicate("name"));
        }
        let Some(shuttle) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        name.clone_into(&mut shuttle.name);
        Ok(Some(shuttle.clone()))
    }

    async fn delete(&self, id: ShuttleId) -> Result<bool, ShuttleRepositoryError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
