//! Export Routes
//!
//! - GET /api/v1/export - Filtered rows as a CSV attachment

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::ViewParams;
use crate::api::error::ApiResult;
use crate::api::routes::rows::run_filter;
use crate::api::state::AppState;
use crate::error::ViewerError;
use crate::export::to_csv_bytes;

/// GET /api/v1/export
///
/// Same parameters as `/api/v1/rows`. The file holds every retained row,
/// never the truncated page view.
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> ApiResult<Response> {
    let (config, outcome) = run_filter(&state, &params)?;
    let rows = outcome.into_rows();

    let body = to_csv_bytes(&rows).map_err(ViewerError::from)?;

    tracing::info!(
        rows = rows.len(),
        bytes = body.len(),
        file = %config.export.file_name,
        "Exported CSV"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", config.export.file_name),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}
