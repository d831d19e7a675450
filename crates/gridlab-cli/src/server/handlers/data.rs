//! Grid page and dataset replacement handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use gridlab::grid::ColumnFilter;
use gridlab::{Dataset, GridPage, GridQuery, SortConfig, SortDirection};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query string of `GET /api/data`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataParams {
    pub search: String,
    pub sort: Option<String>,
    pub direction: SortDirection,
    pub page: Option<usize>,
    pub rows_per_page: Option<usize>,
    /// Filter expressions separated by `;`, e.g. `age>30;plan=pro`.
    pub filter: Option<String>,
    /// Comma-separated columns the search looks at.
    pub columns: Option<String>,
}

impl DataParams {
    fn to_query(&self) -> Result<GridQuery, ApiError> {
        let mut query = GridQuery::new()
            .with_search(self.search.as_str())
            .with_page(self.page.unwrap_or(1))
            .with_rows_per_page(self.rows_per_page.unwrap_or(0));

        if let Some(key) = &self.sort {
            query = query.with_sort(SortConfig::by(key.as_str(), self.direction));
        }
        if let Some(filters) = &self.filter {
            for expr in filters.split(';').filter(|e| !e.trim().is_empty()) {
                query = query.with_filter(ColumnFilter::parse(expr).map_err(ApiError::BadRequest)?);
            }
        }
        if let Some(columns) = &self.columns {
            query = query.with_visible_columns(
                columns.split(',').map(|c| c.trim().to_string()).collect(),
            );
        }

        Ok(query)
    }
}

/// One page of the grid.
pub async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Result<Json<GridPage>, ApiError> {
    let query = params.to_query()?;
    let data = state.dataset.read().await;
    Ok(Json(state.gridlab.query(&data, &query)))
}

/// One page of the grid for a full JSON query.
pub async fn query_data(
    State(state): State<AppState>,
    Json(query): Json<GridQuery>,
) -> Json<GridPage> {
    let data = state.dataset.read().await;
    Json(state.gridlab.query(&data, &query))
}

/// Response after the dataset changes.
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub columns: Vec<String>,
    pub row_count: usize,
}

impl DatasetResponse {
    pub fn describe(data: &Dataset) -> Self {
        Self {
            columns: data.columns().into_iter().map(String::from).collect(),
            row_count: data.row_count(),
        }
    }
}

/// Replace the served dataset with the posted rows.
pub async fn replace_dataset(
    State(state): State<AppState>,
    Json(data): Json<Dataset>,
) -> Json<DatasetResponse> {
    let response = DatasetResponse::describe(&data);
    state.replace(data).await;
    Json(response)
}
