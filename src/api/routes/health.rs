//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (configured database opens)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::store::TableReader;

/// Result of probing the configured database
enum DatabaseHealth {
    Ok,
    Missing,
    Error,
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 when the configured database can be opened read-only.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_database(&state) {
        DatabaseHealth::Ok => StatusCode::OK,
        DatabaseHealth::Missing | DatabaseHealth::Error => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, database) = match check_database(&state) {
        DatabaseHealth::Ok => ("healthy", "ok"),
        DatabaseHealth::Missing => ("unconfigured", "missing"),
        DatabaseHealth::Error => ("unavailable", "error"),
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn check_database(state: &AppState) -> DatabaseHealth {
    let Some(path) = state.config.source.db_path.as_deref() else {
        return DatabaseHealth::Missing;
    };

    match TableReader::open(path) {
        Ok(_) => DatabaseHealth::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            DatabaseHealth::Error
        }
    }
}
