//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;

use axum::Router;
use chill_common::{AppConfig, AppError};
use chill_db::{create_pool, run_migrations, PoolConfig, DEFAULT_ROOMS};
use chill_service::{RoomService, ServiceContext};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, docs_routes, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health and docs routes are merged after the rate limiter is applied, so
/// they bypass it.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();

    let router = create_router(config.storage.max_upload_bytes());
    let router = apply_rate_limit(router, &config.rate_limit)?;
    let router = router.merge(health_routes()).merge(docs_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());

    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
///
/// Runs pending migrations and seeds the default rooms when configured.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &config.database.migrations_dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!(dir = %config.database.migrations_dir, "Migrations applied");
    }

    let service_context = ServiceContext::from_pool(pool.clone(), &config)
        .map_err(|e| AppError::Config(e.to_string()))?;

    if config.seed_rooms {
        let created = RoomService::new(&service_context)
            .seed_rooms(DEFAULT_ROOMS)
            .await?;
        info!(created, "Default rooms seeded");
    }

    Ok(AppState::new(service_context, config).with_pool(pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let state = create_app_state(config).await?;
    let app = create_app(state)?;
    run_server(app, &addr).await
}
