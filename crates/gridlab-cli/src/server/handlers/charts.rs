//! Chart data handler.

use axum::{
    Json,
    extract::{Query, State},
};
use gridlab::Row;
use gridlab::grid::{Aggregation, ChartKind, group_aggregate, suggest_charts};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query string of `GET /api/chart-data`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChartParams {
    /// Category column.
    pub x: Option<String>,
    /// Comma-separated value columns.
    pub y: Option<String>,
    pub aggregation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub suggested: Vec<ChartKind>,
    pub data: Vec<Row>,
}

/// Suggested chart kinds plus the (optionally grouped) series.
pub async fn get_chart_data(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> Result<Json<ChartResponse>, ApiError> {
    let aggregation: Aggregation = match &params.aggregation {
        Some(name) => name.parse().map_err(ApiError::BadRequest)?,
        None => Aggregation::None,
    };
    let data = state.dataset.read().await;

    let rows = match &params.x {
        Some(x) => {
            let columns: Vec<String> = params
                .y
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            group_aggregate(&data.rows, x, &columns, aggregation)
        }
        None => data.rows.clone(),
    };

    Ok(Json(ChartResponse {
        suggested: suggest_charts(&data),
        data: rows,
    }))
}
