//! Process settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use shuttle_backend::domain::{AdminSeed, DEFAULT_SENDER, DispatchPolicy};
use shuttle_backend::inbound::http::state::HttpState;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings loaded via OrthoConfig from `SHUTTLE_*` variables, CLI flags
/// and configuration files.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHUTTLE")]
pub struct ServerSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps state in memory.
    pub database_url: Option<String>,
    /// Pool size override.
    pub database_max_connections: Option<u32>,
    /// HTTP mail relay endpoint. Without it credential mail is only logged.
    pub mail_relay_url: Option<String>,
    /// Relay request timeout in seconds.
    #[ortho_config(default = 10)]
    pub mail_timeout_secs: u64,
    /// `From` address of credential mail.
    pub mail_sender: Option<String>,
    /// Seconds between outbox polls.
    #[ortho_config(default = 15)]
    pub outbox_poll_secs: u64,
    /// Delivery attempts before a message is abandoned.
    pub outbox_max_attempts: Option<u32>,
    /// Messages claimed per poll.
    pub outbox_batch_size: Option<usize>,
    /// Seeded administrator username.
    pub admin_username: Option<String>,
    /// Seeded administrator email.
    pub admin_email: Option<String>,
    /// Seeded administrator password.
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_configured", &self.database_url.is_some())
            .field("mail_relay_url", &self.mail_relay_url)
            .field("admin_username", &self.admin_username)
            .finish_non_exhaustive()
    }
}

/// Settings that failed validation after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid SHUTTLE_BIND_ADDR '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid SHUTTLE_MAIL_RELAY_URL '{value}': {message}")]
    RelayUrl { value: String, message: String },
    #[error("SHUTTLE_OUTBOX_POLL_SECS must be positive")]
    ZeroPollInterval,
    #[error("SHUTTLE_OUTBOX_MAX_ATTEMPTS must be positive")]
    ZeroAttempts,
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Relay endpoint, when configured.
    pub fn mail_relay_url(&self) -> Result<Option<reqwest::Url>, SettingsError> {
        self.mail_relay_url
            .as_deref()
            .map(|raw| {
                reqwest::Url::parse(raw).map_err(|err| SettingsError::RelayUrl {
                    value: raw.to_owned(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }

    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs)
    }

    pub fn mail_sender(&self) -> &str {
        self.mail_sender.as_deref().unwrap_or(DEFAULT_SENDER)
    }

    /// Interval between dispatcher passes.
    pub fn outbox_poll_interval(&self) -> Result<Duration, SettingsError> {
        match self.outbox_poll_secs {
            0 => Err(SettingsError::ZeroPollInterval),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Retry policy with configured overrides applied.
    pub fn dispatch_policy(&self) -> Result<DispatchPolicy, SettingsError> {
        let defaults = DispatchPolicy::default();
        let max_attempts = self.outbox_max_attempts.unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(SettingsError::ZeroAttempts);
        }
        Ok(DispatchPolicy {
            max_attempts,
            batch_size: self.outbox_batch_size.unwrap_or(defaults.batch_size).max(1),
            ..defaults
        })
    }

    /// Administrator seed when all three `SHUTTLE_ADMIN_*` values are set.
    pub fn admin_seed(&self) -> Option<AdminSeed> {
        match (&self.admin_username, &self.admin_email, &self.admin_password) {
            (Some(username), Some(email), Some(password)) => {
                Some(AdminSeed::new(username.clone(), email.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        http_state: HttpState,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            http_state,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
