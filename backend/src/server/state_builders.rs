//! Adapter selection and HTTP state assembly.

use std::sync::Arc;

use tracing::{info, warn};

use shuttle_backend::domain::ports::{
    AccountRepository, CredentialHasher, Mailer, NotificationOutbox, RoleCatalog,
    ShuttleRepository, StopRepository,
};
use shuttle_backend::domain::{
    AccountLoginService, AccountProvisioner, DriverAccountService, ShuttleService, StopService,
};
use shuttle_backend::inbound::http::state::HttpState;
use shuttle_backend::outbound::mail::{HttpMailRelay, LoggingMailer};
use shuttle_backend::outbound::memory::{
    InMemoryAccountRepository, InMemoryNotificationOutbox, InMemoryRoleCatalog,
    InMemoryShuttleRepository, InMemoryStopRepository,
};
use shuttle_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselNotificationOutbox, DieselRoleCatalog,
    DieselShuttleRepository, DieselStopRepository,
};

use super::config::{ServerSettings, SettingsError};

/// Driven-port implementations shared by the HTTP services and the
/// dispatcher.
#[derive(Clone)]
pub struct Adapters {
    pub accounts: Arc<dyn AccountRepository>,
    pub stops: Arc<dyn StopRepository>,
    pub shuttles: Arc<dyn ShuttleRepository>,
    pub outbox: Arc<dyn NotificationOutbox>,
    pub roles: Arc<dyn RoleCatalog>,
}

impl Adapters {
    /// PostgreSQL-backed adapters sharing one pool.
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            stops: Arc::new(DieselStopRepository::new(pool.clone())),
            shuttles: Arc::new(DieselShuttleRepository::new(pool.clone())),
            outbox: Arc::new(DieselNotificationOutbox::new(pool.clone())),
            roles: Arc::new(DieselRoleCatalog::new(pool.clone())),
        }
    }

    /// Process-local adapters; state is lost on restart.
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            stops: Arc::new(InMemoryStopRepository::new()),
            shuttles: Arc::new(InMemoryShuttleRepository::new()),
            outbox: Arc::new(InMemoryNotificationOutbox::new()),
            roles: Arc::new(InMemoryRoleCatalog::default()),
        }
    }
}

/// Wire the domain services behind the HTTP driving ports.
pub fn build_http_state(
    adapters: &Adapters,
    hasher: Arc<dyn CredentialHasher>,
    mail_sender: &str,
) -> HttpState {
    let provisioner = AccountProvisioner::new(
        adapters.accounts.clone(),
        hasher.clone(),
        adapters.outbox.clone(),
        mail_sender,
    );
    HttpState::new(
        Arc::new(AccountLoginService::new(adapters.accounts.clone(), hasher)),
        Arc::new(DriverAccountService::new(adapters.accounts.clone(), provisioner)),
        Arc::new(StopService::new(adapters.stops.clone())),
        Arc::new(ShuttleService::new(adapters.shuttles.clone())),
    )
}

/// Failure constructing the mail transport.
#[derive(Debug, thiserror::Error)]
pub enum MailerSetupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build mail relay client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP relay when configured, otherwise a transport that only logs.
pub fn build_mailer(settings: &ServerSettings) -> Result<Arc<dyn Mailer>, MailerSetupError> {
    match settings.mail_relay_url()? {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "mail relay configured");
            Ok(Arc::new(HttpMailRelay::new(endpoint, settings.mail_timeout())?))
        }
        None => {
            warn!("SHUTTLE_MAIL_RELAY_URL not set; credential mail will only be logged");
            Ok(Arc::new(LoggingMailer))
        }
    }
}
