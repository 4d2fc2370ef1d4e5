//! Domain ports: the edges of the hexagon.
//!
//! Driven ports (repositories, outbox, mailer, hasher, metrics) are implemented by
//! outbound adapters and return typed errors built with
//! `define_port_error!`. Driving ports (login, accounts, stops, shuttles)
//! are implemented by domain services and called by inbound adapters; they
//! return the transport-agnostic [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod credential_hasher;
mod dispatch_metrics;
mod driver_accounts;
mod login_service;
mod mailer;
mod notification_outbox;
mod role_catalog;
mod shuttle_fleet;
mod shuttle_repository;
mod stop_catalog;
mod stop_repository;

pub use account_repository::{AccountLogin, AccountRepository, AccountRepositoryError};
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
pub use dispatch_metrics::{
    DeliveryOutcome, DispatchMetrics, DispatchMetricsError, NoOpDispatchMetrics,
};
pub use driver_accounts::DriverAccounts;
pub use login_service::LoginService;
pub use mailer::{Mailer, MailerError};
pub use notification_outbox::{NotificationOutbox, NotificationOutboxError};
pub use role_catalog::{RoleCatalog, RoleCatalogError};
pub use shuttle_fleet::ShuttleFleet;
pub use shuttle_repository::{ShuttleRepository, ShuttleRepositoryError};
pub use stop_catalog::StopCatalog;
pub use stop_repository::{StopRepository, StopRepositoryError};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
#[cfg(test)]
pub use dispatch_metrics::MockDispatchMetrics;
#[cfg(test)]
pub use driver_accounts::MockDriverAccounts;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use mailer::MockMailer;
#[cfg(test)]
pub use notification_outbox::MockNotificationOutbox;
#[cfg(test)]
pub use role_catalog::MockRoleCatalog;
#[cfg(test)]
pub use shuttle_fleet::MockShuttleFleet;
#[cfg(test)]
pub use shuttle_repository::MockShuttleRepository;
#[cfg(test)]
pub use stop_catalog::MockStopCatalog;
#[cfg(test)]
pub use stop_repository::MockStopRepository;
