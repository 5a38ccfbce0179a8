//! Service entry-point: loads settings, prepares storage, and runs the HTTP server.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rota::inbound::http::health::HealthState;
use rota::inbound::http::session_config::{BuildMode, session_settings_from_env};
use rota::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use rota::settings::RotaSettings;
use server::{ServerConfig, create_server};

/// Open the connection pool, applying pending migrations first unless skipped.
async fn connect_database(
    settings: &RotaSettings,
    database_url: &str,
) -> std::io::Result<DbPool> {
    if settings.skip_migrations {
        info!("skipping database migrations");
    } else {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
    }
    let config = PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
    DbPool::new(config).await.map_err(std::io::Error::other)
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

    let settings = RotaSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let generator = settings.generator_options().map_err(std::io::Error::other)?;
    let session_env = DefaultEnv::new();
    let session = session_settings_from_env(&session_env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr).with_generator_options(generator);

    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(&settings, database_url).await?);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "rota listening");
    server.await
}
