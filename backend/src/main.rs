//! Backend entry-point: loads settings, selects adapters, seeds the
//! administrator, starts the outbox dispatcher and serves the REST API.

mod server;

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shuttle_backend::domain::ports::CredentialHasher;
use shuttle_backend::domain::{
    BootstrapOutcome, NotificationDispatcher, ensure_admin, verify_role_catalog,
};
use shuttle_backend::inbound::http::health::HealthState;
use shuttle_backend::inbound::http::session_config::fingerprint::key_fingerprint;
use shuttle_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use shuttle_backend::outbound::crypto::Argon2CredentialHasher;
#[cfg(feature = "metrics")]
use shuttle_backend::outbound::metrics::PrometheusDispatchMetrics;
use shuttle_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{Adapters, ServerConfig, ServerSettings, build_http_state, build_mailer, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

async fn select_adapters(settings: &ServerSettings) -> io::Result<Adapters> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("SHUTTLE_DATABASE_URL not set; using in-memory storage");
        return Ok(Adapters::in_memory());
    };
    run_pending_migrations(database_url)
        .await
        .map_err(|err| startup_error("database migration failed", err))?;
    let mut config = PoolConfig::new(database_url);
    if let Some(max) = settings.database_max_connections {
        config = config.with_max_size(max);
    }
    let pool = DbPool::new(config)
        .await
        .map_err(|err| startup_error("database pool setup failed", err))?;
    info!("database pool ready");
    Ok(Adapters::diesel(&pool))
}

async fn seed_admin(
    settings: &ServerSettings,
    adapters: &Adapters,
    hasher: &dyn CredentialHasher,
) -> io::Result<()> {
    let Some(seed) = settings.admin_seed() else {
        info!("no administrator seed configured");
        return Ok(());
    };
    match ensure_admin(adapters.accounts.as_ref(), hasher, &seed)
        .await
        .map_err(|err| startup_error("administrator bootstrap failed", err))?
    {
        BootstrapOutcome::Created(id) => info!(account_id = %id, "administrator created"),
        BootstrapOutcome::AlreadyPresent => info!("administrator already present"),
    }
    Ok(())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter([OsString::from("shuttle-backend")])
        .map_err(|err| startup_error("invalid settings", err))?;
    info!(settings = ?settings, "settings loaded");

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("invalid session configuration", err))?;
    info!(fingerprint = %key_fingerprint(&session.key), "session signing key loaded");

    let bind_addr = settings
        .socket_addr()
        .map_err(|err| startup_error("invalid settings", err))?;
    let poll_interval = settings
        .outbox_poll_interval()
        .map_err(|err| startup_error("invalid settings", err))?;
    let policy = settings
        .dispatch_policy()
        .map_err(|err| startup_error("invalid settings", err))?;

    let health_state = web::Data::new(HealthState::new());

    let adapters = select_adapters(&settings).await?;
    verify_role_catalog(adapters.roles.as_ref())
        .await
        .map_err(|err| startup_error("role catalog check failed", err))?;

    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher::new());
    seed_admin(&settings, &adapters, hasher.as_ref()).await?;

    let mailer = build_mailer(&settings).map_err(|err| startup_error("mailer setup failed", err))?;
    let dispatcher = NotificationDispatcher::new(
        adapters.outbox.clone(),
        mailer,
        Arc::new(DefaultClock),
        policy,
    );

    let http_state = build_http_state(&adapters, hasher, settings.mail_sender());
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        http_state,
    );

    #[cfg(feature = "metrics")]
    let (config, dispatcher) = {
        let prometheus = PrometheusMetricsBuilder::new("shuttle")
            .endpoint("/metrics")
            .build()
            .map_err(|err| startup_error("failed to configure Prometheus metrics", err))?;
        let dispatch_metrics = PrometheusDispatchMetrics::new(&prometheus.registry)
            .map_err(|err| startup_error("dispatch metrics registration failed", err))?;
        (
            config.with_metrics(prometheus),
            dispatcher.with_metrics(Arc::new(dispatch_metrics)),
        )
    };

    let dispatcher_task = tokio::spawn(dispatcher.run(poll_interval));

    let server = create_server(health_state.clone(), config)?;
    health_state.mark_ready();
    info!(addr = %bind_addr, "server listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    dispatcher_task.abort();
    outcome
}
