//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and the outbox using Diesel
//! - **memory**: process-local stand-ins used without a database and in tests
//! - **crypto**: Argon2id password hashing
//! - **mail**: HTTP mail relay and a logging transport
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod crypto;
pub mod mail;
pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
