//! Backend entry-point: loads settings, prepares the database and serves HTTP.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use labrank::inbound::http::health::HealthState;
use labrank::inbound::http::session_config::{
    BuildMode, SessionConfigError, session_settings_from_env,
};
use labrank::outbound::persistence::{DbPool, MigrationError, PoolConfig, PoolError, run_migrations};
use labrank::startup::{
    AppSettings, CatalogueStartupError, SettingsError, seed_catalogue_on_startup,
};
use server::{ServerConfig, create_server};

/// Failures that stop the service before it starts listening.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] SessionConfigError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Catalogue(#[from] CatalogueStartupError),
}

impl From<StartupError> for std::io::Error {
    fn from(error: StartupError) -> Self {
        Self::other(error.to_string())
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| StartupError::Config(err.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(StartupError::from)?;
    info!(
        fingerprint = %session.key_fingerprint(),
        "session signing key loaded"
    );

    let database_url = settings.resolve_database_url().map_err(StartupError::from)?;
    run_migrations(&database_url)
        .await
        .map_err(StartupError::from)?;
    let db_pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(StartupError::from)?;
    seed_catalogue_on_startup(&settings, &db_pool)
        .await
        .map_err(StartupError::from)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.socket_addr().map_err(StartupError::from)?,
        db_pool,
    );
    if let Some(rounds) = settings.hash_rounds {
        config = config.with_hash_rounds(rounds);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = settings.bind_addr(), "labrank listening");
    server.await
}
