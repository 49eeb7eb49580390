use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use common::{
    config::ServerConfig,
    database::{DatabaseConfig, init_pool, run_migrations},
    telemetry,
};
use tokio::net::TcpListener;

use orders::{
    AppState,
    repositories::{OrderRepository, OrderTagRepository},
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing()?;

    info!("Starting orders service");

    let server_config = ServerConfig::load("ORDERS", 3001)?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let app_state = AppState {
        orders: Arc::new(OrderRepository::new(pool.clone())),
        order_tags: Arc::new(OrderTagRepository::new(pool)),
    };

    let app = routes::create_router(app_state);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Orders service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
