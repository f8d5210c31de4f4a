//! Rows Routes
//!
//! - GET /api/v1/rows - Filtered rows, summary and counts as JSON

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{RowsResponse, ViewParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::config::Config;
use crate::pipeline::{load_and_filter, FilterOutcome};

/// GET /api/v1/rows
///
/// Absent or empty bounds are unbounded. Rows with unparseable dates are
/// always excluded.
pub async fn get_rows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> ApiResult<Json<RowsResponse>> {
    let (config, outcome) = run_filter(&state, &params)?;

    let source_rows = outcome.source_rows;
    let unparsed_rows = outcome.unparsed_rows;
    let summary = outcome.summary.clone();
    let (columns, rows) = outcome.into_rows().into_parts();

    Ok(Json(RowsResponse {
        table: config.source.table_name,
        columns,
        rows,
        source_rows,
        unparsed_rows,
        summary,
    }))
}

/// Resolve request configuration and criteria, then run the pipeline
pub(crate) fn run_filter(
    state: &AppState,
    params: &ViewParams,
) -> ApiResult<(Config, FilterOutcome)> {
    let (from, to) = params.bounds().map_err(ApiError::Validation)?;

    let config = state.config_for(params);
    let criteria = config.filter.criteria(from, to, &params.field_values());
    let outcome = load_and_filter(&config, &criteria)?;

    Ok((config, outcome))
}
