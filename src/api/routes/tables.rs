//! Table Routes
//!
//! - GET /api/v1/tables - Tables and views in the database

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{TablesResponse, ViewParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::pipeline;

/// GET /api/v1/tables
pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> ApiResult<Json<TablesResponse>> {
    let config = state.config_for(&params);
    let tables = pipeline::list_tables(&config.source)?;
    Ok(Json(TablesResponse { tables }))
}
