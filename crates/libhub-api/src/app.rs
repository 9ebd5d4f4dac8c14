//! Application builder: wires stores, services and the router, then serves.

use std::sync::Arc;

use axum::Router;

use libhub_core::config::AppConfig;
use libhub_core::error::{AppError, ErrorKind};
use libhub_core::traits::{BlobStorage, SystemClock};
use libhub_database::LibraryStore;
use libhub_service::LoggingNotifier;
use libhub_storage::LocalBlobStorage;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application for `state`.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the LibHub server with the given configuration until a shutdown
/// signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        backend = ?config.database.backend,
        "Starting LibHub v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = LibraryStore::from_config(&config.database).await?;

    tracing::info!(root = %config.storage.resources_root, "Initializing resource storage");
    let storage: Arc<dyn BlobStorage> =
        Arc::new(LocalBlobStorage::new(&config.storage.resources_root).await?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(
        config,
        store.clone(),
        storage,
        Arc::new(SystemClock),
        Arc::new(LoggingNotifier),
    )?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    tracing::info!("LibHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    store.close().await;
    tracing::info!("LibHub server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
