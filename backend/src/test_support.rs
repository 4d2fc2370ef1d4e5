//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! [`TestBackend`] wires the real domain services to in-memory adapters so
//! suites can drive the HTTP surface and then inspect what was stored.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use argon2::Params;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{CredentialHasher, Mailer, MailerError};
use crate::domain::{
    AccountLoginService, AccountProvisioner, AdminSeed, BootstrapOutcome, DEFAULT_SENDER,
    DriverAccountService, Error, OutgoingEmail, ShuttleService, StopService, ensure_admin,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::crypto::Argon2CredentialHasher;
use crate::outbound::memory::{
    InMemoryAccountRepository, InMemoryNotificationOutbox, InMemoryShuttleRepository,
    InMemoryStopRepository,
};

/// Argon2id with minimal cost so login-heavy suites stay fast.
pub fn fast_hasher() -> Arc<Argon2CredentialHasher> {
    let params = Params::new(256, 1, 1, None).unwrap_or_default();
    Arc::new(Argon2CredentialHasher::with_params(params))
}

/// Session middleware for tests: fresh key, plain HTTP cookies.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Pull the generated password out of a credential email body.
pub fn password_from_email(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("Password: "))
        .map(str::to_owned)
}

/// Domain services over in-memory adapters, with the adapters kept for
/// inspection.
pub struct TestBackend {
    pub accounts: Arc<InMemoryAccountRepository>,
    pub stops: Arc<InMemoryStopRepository>,
    pub shuttles: Arc<InMemoryShuttleRepository>,
    pub outbox: Arc<InMemoryNotificationOutbox>,
    pub hasher: Arc<Argon2CredentialHasher>,
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            stops: Arc::new(InMemoryStopRepository::new()),
            shuttles: Arc::new(InMemoryShuttleRepository::new()),
            outbox: Arc::new(InMemoryNotificationOutbox::new()),
            hasher: fast_hasher(),
        }
    }

    /// HTTP state backed by this backend's adapters.
    pub fn http_state(&self) -> HttpState {
        let hasher: Arc<dyn CredentialHasher> = self.hasher.clone();
        let provisioner = AccountProvisioner::new(
            self.accounts.clone(),
            hasher.clone(),
            self.outbox.clone(),
            DEFAULT_SENDER,
        );
        HttpState::new(
            Arc::new(AccountLoginService::new(self.accounts.clone(), hasher)),
            Arc::new(DriverAccountService::new(self.accounts.clone(), provisioner)),
            Arc::new(StopService::new(self.stops.clone())),
            Arc::new(ShuttleService::new(self.shuttles.clone())),
        )
    }

    /// Store an administrator the way startup seeding does.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<BootstrapOutcome, Error> {
        let seed = AdminSeed::new(username, format!("{username}@umd.edu"), password);
        ensure_admin(self.accounts.as_ref(), self.hasher.as_ref(), &seed).await
    }
}

/// Mailer that records deliveries and can fail a set number of times first.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failures_left: Mutex<usize>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `times` sends with a transport error.
    pub fn failing(times: usize) -> Self {
        Self {
            sent: Mutex::default(),
            failures_left: Mutex::new(times),
        }
    }

    /// Emails delivered so far, oldest first.
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let mut failures_left = self.failures_left.lock().await;
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(MailerError::transport("relay unavailable"));
        }
        drop(failures_left);
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}
