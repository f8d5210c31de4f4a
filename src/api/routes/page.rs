//! Page Routes
//!
//! - GET / - Sidebar form, summary metrics, results table and download link

use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::api::dto::ViewParams;
use crate::api::error::ApiError;
use crate::api::routes::rows::run_filter;
use crate::api::state::AppState;
use crate::api::templates::{render_index, Notice, PageView};
use crate::error::ViewerError;
use crate::pipeline::require_source;

/// GET /
///
/// Absent `from`/`to` fall back to the configured default range ending
/// today; present but empty bounds are unbounded. Failures are rendered
/// inline so the form stays usable.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewParams>,
) -> Html<String> {
    Html(render(&state, params, Local::now().date_naive()))
}

pub(crate) fn render(state: &AppState, params: ViewParams, today: NaiveDate) -> String {
    let config = state.config_for(&params);
    let (default_from, default_to) = config.filter.default_range(today);

    let effective = ViewParams {
        from: Some(
            params
                .from
                .unwrap_or_else(|| default_from.format("%Y-%m-%d").to_string()),
        ),
        to: Some(
            params
                .to
                .unwrap_or_else(|| default_to.format("%Y-%m-%d").to_string()),
        ),
        ..params
    };

    // Missing path or table is a prompt; anything after that is a failure
    let outcome = match require_source(&config.source) {
        Err(ViewerError::Configuration(prompt)) => Err(Notice::Info(prompt)),
        Err(e) => Err(notice_for(&e.into())),
        Ok(_) => run_filter(state, &effective)
            .map(|(_, outcome)| outcome)
            .map_err(|e| notice_for(&e)),
    };
    let result = outcome.as_ref().map_err(Clone::clone);

    let db_path = config
        .source
        .db_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let field_inputs = [
        ("field1", effective.field1.as_deref()),
        ("field2", effective.field2.as_deref()),
    ];
    let fields = config
        .filter
        .field_columns
        .iter()
        .zip(field_inputs)
        .map(|(label, (name, value))| (name, label.as_str(), value.unwrap_or("")))
        .collect();

    render_index(&PageView {
        db_path: &db_path,
        table: &config.source.table_name,
        from: effective.from.as_deref().unwrap_or(""),
        to: effective.to.as_deref().unwrap_or(""),
        date_column: &config.filter.date_column,
        fields,
        amount_column: config.filter.amount_column.as_deref(),
        result,
        export_query: effective.to_query_string(),
        row_limit: config.server.page_row_limit,
    })
}

fn notice_for(err: &ApiError) -> Notice {
    match err {
        ApiError::Validation(message) => Notice::Error(message.clone()),
        other => {
            tracing::warn!(error = %other, "Page load failed");
            Notice::Error(other.to_string())
        }
    }
}
