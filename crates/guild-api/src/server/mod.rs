//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use guild_common::{AppConfig, AppError};
use guild_core::SnowflakeGenerator;
use guild_db::{create_pool, run_migrations, DatabaseConfig, MemoryStore};
use guild_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::jobs::spawn_sweep;
use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = create_router().merge(health_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
///
/// Without a database URL the service runs on the in-process store.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = match &config.database {
        Some(database) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            ServiceContextBuilder::new().postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store. Data is lost on restart.");
            ServiceContextBuilder::new().memory_store(MemoryStore::new())
        }
    };

    let service_context = builder
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .settlement_policy(config.auction.settlement_policy)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;
    let sweep_config = config.sweep.clone();

    let state = create_app_state(config).await?;
    let sweep = spawn_sweep(state.shared_context(), sweep_config);

    let app = create_app(state);
    let result = run_server(app, addr).await;

    sweep.abort();
    result
}
