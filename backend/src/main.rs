//! Backend entry-point: loads settings, prepares the database and identity
//! verifier, then serves REST, WebSocket and health endpoints.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use tradepost::inbound::http::health::HealthState;
use tradepost::outbound::identity::JwtIdentityVerifier;
use tradepost::outbound::persistence::{DbPool, run_pending_migrations};
use tradepost::settings::AppSettings;

fn startup_error(stage: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{stage}: {error}"))
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

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|error| startup_error("failed to load settings", error))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| startup_error("invalid settings", error))?;
    let pool_config = settings
        .pool_config()
        .map_err(|error| startup_error("invalid settings", error))?;
    let jwt_config = settings
        .jwt_config()
        .map_err(|error| startup_error("invalid settings", error))?;
    let allowed_origins = settings
        .origin_allow_list()
        .map_err(|error| startup_error("invalid settings", error))?;

    if settings.run_migrations {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(|error| startup_error("migrations failed", error))?;
    }

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|error| startup_error("database unavailable", error))?;
    let verifier = JwtIdentityVerifier::new(jwt_config)
        .map_err(|error| startup_error("invalid identity verifier settings", error))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool, Arc::new(verifier))
        .with_allowed_origins(allowed_origins);
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "tradepost listening");
    server.await
}
