//! Report Viewer HTTP layer
//!
//! Server-rendered page plus a small JSON API, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Filter form, summary metrics, results table, CSV download
//!
//! ## API
//! - `GET /api/v1/rows` - Filtered rows as JSON
//! - `GET /api/v1/export` - Filtered rows as a CSV attachment
//! - `GET /api/v1/tables` - Tables and views in the database
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! All endpoints accept `db_path`, `table`, `from`, `to`, `field1` and
//! `field2` query parameters; see [`dto::ViewParams`].
//!
//! # Example
//!
//! ```rust,no_run
//! use report_viewer::api::{serve, AppState};
//! use report_viewer::config::Config;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let server = config.server.clone();
//!     serve(AppState::new(config), &server).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/rows", get(routes::rows::get_rows))
        .route("/export", get(routes::export::export_csv))
        .route("/tables", get(routes::tables::list_tables));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the server and run until Ctrl+C or SIGTERM
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let source = state.config.source.clone();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        db_path = ?source.db_path,
        table = %source.table_name,
        "Report viewer listening on http://{}",
        addr
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Report viewer shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
