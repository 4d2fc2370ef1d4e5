//! In-memory stop store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{StopRepository, StopRepositoryError};
use crate::domain::{Stop, StopFields, StopId};

#[derive(Debug, Default)]
struct StopTable {
    last_id: i64,
    rows: BTreeMap<StopId, Stop>,
}

impl StopTable {
    fn abbr_taken(&self, abbr: &str, except: Option<StopId>) -> bool {
        self.rows
            .values()
            .any(|stop| Some(stop.id) != except && stop.abbr == abbr)
    }
}

/// Stop repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStopRepository {
    table: RwLock<StopTable>,
}

impl InMemoryStopRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StopRepository for InMemoryStopRepository {
    async fn list(&self) -> Result<Vec<Stop>, StopRepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: StopId) -> Result<Option<Stop>, StopRepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, name: &str, abbr: &str) -> Result<Stop, StopRepositoryError> {
        let mut table = self.table.write().await;
        if table.abbr_taken(abbr, None) {
            return Err(StopRepositoryError::duplicate("abbr"));
        }
        table.last_id += 1;
        let stop = Stop {
            id: StopId::new(table.last_id),
            name: name.to_owned(),
            abbr: abbr.to_owned(),
        };
        table.rows.insert(stop.id, stop.clone());
        Ok(stop)
    }

    async fn update(&self, id: StopId, fields: &StopFields) -> Result<Option<Stop>, StopRepositoryError> {
        let mut table = self.table.write().await;
        if let Some(abbr) = &fields.abbr {
            if table.abbr_taken(abbr, Some(id)) {
                return Err(StopRepositoryError::duplicate("abbr"));
            }
        }
        let Some(stop) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        *stop = fields.apply_to(stop);
        Ok(Some(stop.clone()))
    }

    async fn delete(&self, id: StopId) -> Result<bool, StopRepositoryError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
