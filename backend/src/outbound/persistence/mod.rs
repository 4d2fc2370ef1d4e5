//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel row structs and domain
//! types. Rows (`models.rs`) and the `table!` schema (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`; schema changes are applied from embedded migrations.
//!
//! ```ignore
//! use shuttle_backend::outbound::persistence::{DbPool, DieselStopRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shuttle")).await?;
//! let stops = DieselStopRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_notification_outbox;
mod diesel_role_catalog;
mod diesel_shuttle_repository;
mod diesel_stop_repository;
pub(crate) mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_notification_outbox::DieselNotificationOutbox;
pub use diesel_role_catalog::DieselRoleCatalog;
pub use diesel_shuttle_repository::DieselShuttleRepository;
pub use diesel_stop_repository::DieselStopRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
