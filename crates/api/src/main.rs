use anyhow::Result;
use tracing::{info, warn};

use dronehub_api::services::{bootstrap_superadmin, BootstrapOutcome};
use dronehub_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting DroneHub API v{}", env!("CARGO_PKG_VERSION"));

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    match bootstrap_superadmin(&pool, &config.admin).await? {
        BootstrapOutcome::NotConfigured => {
            warn!("No bootstrap superadmin configured; role changes need an existing superadmin")
        }
        BootstrapOutcome::AlreadySuperadmin(user_id) => {
            info!(user_id = %user_id, "Bootstrap superadmin already present")
        }
        BootstrapOutcome::Promoted(user_id) => {
            info!(user_id = %user_id, "Existing account promoted to superadmin")
        }
        BootstrapOutcome::Created(user_id) => {
            info!(user_id = %user_id, "Bootstrap superadmin created")
        }
    }

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
