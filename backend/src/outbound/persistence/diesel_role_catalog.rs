//! PostgreSQL-backed `RoleCatalog`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RoleCatalog, RoleCatalogError};

use super::error_mapping::{classify, impl_from_store_failure, pool_failure};
use super::pool::DbPool;
use super::schema::roles;

impl_from_store_failure!(RoleCatalogError);

/// Reads role names seeded by migrations.
#[derive(Clone)]
pub struct DieselRoleCatalog {
    pool: DbPool,
}

impl DieselRoleCatalog {
    /// Create a catalogue reader over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleCatalog for DieselRoleCatalog {
    async fn role_names(&self) -> Result<Vec<String>, RoleCatalogError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| RoleCatalogError::from(pool_failure(err)))?;
        roles::table
            .select(roles::name)
            .order(roles::name)
            .load::<String>(&mut conn)
            .await
            .map_err(|err| classify(err).into())
    }
}
