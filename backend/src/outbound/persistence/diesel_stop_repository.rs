//! PostgreSQL-backed `StopRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StopRepository, StopRepositoryError};
use crate::domain::{Stop, StopFields, StopId};

use super::error_mapping::{classify, impl_from_store_failure, pool_failure};
use super::models::{NewStopRow, StopRow, StopUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::stops;

impl_from_store_failure!(StopRepositoryError, duplicate);

/// Diesel implementation of [`StopRepository`].
#[derive(Clone)]
pub struct DieselStopRepository {
    pool: DbPool,
}

impl DieselStopRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_error(error: diesel::result::Error) -> StopRepositoryError {
    classify(error).into()
}

fn pool_error(error: PoolError) -> StopRepositoryError {
    pool_failure(error).into()
}

impl From<StopRow> for Stop {
    fn from(row: StopRow) -> Self {
        Self {
            id: StopId::new(row.id),
            name: row.name,
            abbr: row.abbr,
        }
    }
}

#[async_trait]
impl StopRepository for DieselStopRepository {
    async fn list(&self) -> Result<Vec<Stop>, StopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<StopRow> = stops::table
            .select(StopRow::as_select())
            .order(stops::id)
            .load(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Stop::from).collect())
    }

    async fn find_by_id(&self, id: StopId) -> Result<Option<Stop>, StopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<StopRow> = stops::table
            .find(id.get())
            .select(StopRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(store_error)?;
        Ok(row.map(Stop::from))
    }

    async fn create(&self, name: &str, abbr: &str) -> Result<Stop, StopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: StopRow = diesel::insert_into(stops::table)
            .values(&NewStopRow { name, abbr })
            .returning(StopRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn update(&self, id: StopId, fields: &StopFields) -> Result<Option<Stop>, StopRepositoryError> {
        if fields.name.is_none() && fields.abbr.is_none() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changeset = StopUpdate {
            name: fields.name.as_deref(),
            abbr: fields.abbr.as_deref(),
        };
        let row: Option<StopRow> = diesel::update(stops::table.find(id.get()))
            .set(&changeset)
            .returning(StopRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(store_error)?;
        Ok(row.map(Stop::from))
    }

    async fn delete(&self, id: StopId) -> Result<bool, StopRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(stops::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(removed > 0)
    }
}
