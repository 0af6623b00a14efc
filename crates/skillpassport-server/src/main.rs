//! Skill Passport server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillpassport_server::auth::{RoleCapabilities, SesskeyIssuer};
use skillpassport_server::directory::PgDirectory;
use skillpassport_server::store::PgStore;
use skillpassport_server::{create_router, db, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        port = config.port,
        network = config.settings.network.display_name(),
        node_url = %config.settings.demo_node_url,
        "Configuration loaded"
    );

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    info!("Database ready");

    let sesskeys =
        SesskeyIssuer::new(&config.sesskey_secret).context("invalid SESSKEY_SECRET")?;
    let capabilities = RoleCapabilities::new(
        config.managers.iter().copied(),
        config.teachers.iter().copied(),
    );

    let state = AppState::new(
        Arc::new(PgStore::new(pool.clone())),
        Arc::new(PgDirectory::new(pool)),
        Arc::new(capabilities),
        sesskeys,
        config.settings.clone(),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skillpassport_server=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
