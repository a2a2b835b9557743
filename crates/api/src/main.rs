use anyhow::{Context, Result};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

use grooming_api::{app, config, middleware};

/// How often connection pool gauges are refreshed.
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting grooming API v{}", env!("CARGO_PKG_VERSION"));

    let pool = if config.database.is_configured() {
        let pool = persistence::db::create_pool(&(&config.database).into())
            .await
            .context("Failed to connect to database")?;

        if config.database.run_migrations {
            info!("Running database migrations...");
            sqlx::migrate!("../persistence/src/migrations")
                .run(&pool)
                .await?;
            info!("Migrations completed");
        }

        spawn_pool_metrics(pool.clone());
        Some(pool)
    } else {
        warn!("No database configured: running in degraded mode");
        None
    };

    let app = app::create_app(config.clone(), pool)?;

    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_pool_metrics(pool: PgPool) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(POOL_METRICS_INTERVAL);
        loop {
            interval.tick().await;
            persistence::metrics::record_pool_metrics(&pool);
        }
    });
}
