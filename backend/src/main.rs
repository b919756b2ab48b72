#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::roster::import_roster_file;
use backend::settings::AppSettings;
use server::{Repositories, ServerConfig, Storage, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let storage = build_storage(&settings).await?;
    if let Some(path) = settings.roster_path.as_deref() {
        let repos = Repositories::for_storage(&storage);
        import_roster_file(path, repos.alumni.as_ref(), &DefaultClock)
            .await
            .wrap_err("roster import failed")?;
    }

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
        settings.claim_settings()?,
    )
    .with_storage(storage)
    .with_identity_proxy_secret(settings.identity_proxy_secret.clone());

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(
        PrometheusMetricsBuilder::new("reunion")
            .endpoint("/metrics")
            .build()
            .map_err(|e| eyre!("failed to configure Prometheus metrics: {e}"))?,
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}

async fn build_storage(settings: &AppSettings) -> Result<Storage> {
    let Some(url) = settings.database_url(&DefaultEnv::new()) else {
        warn!("no database URL configured; using in-memory storage");
        return Ok(Storage::Memory(Arc::new(InMemoryStore::new())));
    };
    run_migrations(&url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .wrap_err("failed to create database pool")?;
    info!("connected to PostgreSQL");
    Ok(Storage::Postgres(pool))
}
