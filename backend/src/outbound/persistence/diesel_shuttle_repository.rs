//! PostgreSQL-backed `ShuttleRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ShuttleRepository, ShuttleRepositoryError};
use crate::domain::{Shuttle, ShuttleId};

use super::error_mapping::{classify, impl_from_store_failure, pool_failure};
use super::models::ShuttleRow;
use super::pool::{DbPool, PoolError};
use super::schema::shuttles;

impl_from_store_failure!(ShuttleRepositoryError, duplicate);

/// Diesel implementation of [`ShuttleRepository`].
#[derive(Clone)]
pub struct DieselShuttleRepository {
    pool: DbPool,
}

impl DieselShuttleRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_error(error: diesel::result::Error) -> ShuttleRepositoryError {
    classify(error).into()
}

fn pool_error(error: PoolError) -> ShuttleRepositoryError {
    pool_failure(error).into()
}

impl From<ShuttleRow> for Shuttle {
    fn from(row: ShuttleRow) -> Self {
        Self {
            id: ShuttleId::new(row.id),
            name: row.name,
        }
    }
}

#[async_trait]
impl ShuttleRepository for DieselShuttleRepository {
    async fn list(&self) -> Result<Vec<Shuttle>, ShuttleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ShuttleRow> = shuttles::table
            .select(ShuttleRow::as_select())
            .order(shuttles::id)
            .load(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Shuttle::from).collect())
    }

    async fn find_by_id(&self, id: ShuttleId) -> Result<Option<Shuttle>, ShuttleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ShuttleRow> = shuttles::table
            .find(id.get())
            .select(ShuttleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(store_error)?;
        Ok(row.map(Shuttle::from))
    }

    async fn create(&self, name: &str) -> Result<Shuttle, ShuttleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: ShuttleRow = diesel::insert_into(shuttles::table)
            .values(shuttles::name.eq(name))
            .returning(ShuttleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn rename(&self, id: ShuttleId, name: &str) -> Result<Option<Shuttle>, ShuttleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ShuttleRow> = diesel::update(shuttles::table.find(id.get()))
            .set(shuttles::name.eq(name))
            .returning(ShuttleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(store_error)?;
        Ok(row.map(Shuttle::from))
    }

    async fn delete(&self, id: ShuttleId) -> Result<bool, ShuttleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(shuttles::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(removed > 0)
    }
}
