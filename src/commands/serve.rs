//! Serve command - Starts the HTTP server.

use crate::api::{create_router, generate_openapi_file, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::DatabaseHelper;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let mut app_config = config.app;
    args.apply_to(&mut app_config);

    // Initialize database and apply pending migrations
    let db = DatabaseHelper::connect(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    generate_openapi_file(&app_config);

    let addr = app_config.server_addr();
    let app = create_router(AppState::from_database(db.clone(), app_config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)));

    tracing::info!("Shutting down...");
    if let Err(e) = db.dispose().await {
        tracing::error!("Failed to close database pool: {}", e);
    }

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
