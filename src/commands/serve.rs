//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Pick the store backend
    let database = if config.uses_memory_backend() {
        tracing::warn!("Using the in-memory backend, data is lost on shutdown");
        None
    } else {
        let database = Database::connect(&config).await?;
        database.run_migrations().await?;
        Some(Arc::new(database))
    };
    let persistence = match &database {
        Some(database) => Persistence::sea(database.get_connection()),
        None => Persistence::memory(),
    };

    let app_state = AppState::from_config(persistence, database.clone(), &config);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!(
        "{}:{}",
        args.host.unwrap_or_else(|| config.server_host.clone()),
        args.port.unwrap_or(config.server_port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("API docs on http://{}/swagger-ui", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");

    if let Some(database) = database.as_deref() {
        database.clone().close().await?;
    }

    Ok(())
}

/// Resolve when the process receives Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
