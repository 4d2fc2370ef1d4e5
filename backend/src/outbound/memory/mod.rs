//! In-memory adapters for every driven port.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. State
//! lives behind `tokio::sync::RwLock`; uniqueness rules mirror the database
//! constraints so behaviour matches the Diesel adapters.

mod accounts;
mod outbox;
mod roles;
mod shuttles;
mod stops;

pub use accounts::InMemoryAccountRepository;
pub use outbox::{InMemoryNotificationOutbox, OutboxEntry, OutboxState};
pub use roles::InMemoryRoleCatalog;
pub use shuttles::InMemoryShuttleRepository;
pub use stops::InMemoryStopRepository;
