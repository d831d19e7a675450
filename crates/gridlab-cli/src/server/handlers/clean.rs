//! Cleaning handler.

use axum::{Json, extract::State};
use gridlab::Dataset;
use gridlab::cleaning::CellChange;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Body of `POST /api/process-data-clean`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CleanRequest {
    /// Rows to clean; the served dataset when absent.
    pub data: Option<Dataset>,
    /// Replace the served dataset with the cleaned rows.
    pub apply: bool,
}

#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub processed_data: Dataset,
    pub outliers: IndexMap<String, Vec<usize>>,
    pub imputed: Vec<CellChange>,
    pub standardized: Vec<CellChange>,
}

pub async fn clean_data(
    State(state): State<AppState>,
    Json(request): Json<CleanRequest>,
) -> Result<Json<CleanResponse>, ApiError> {
    let data = match request.data {
        Some(data) => data,
        None => state.snapshot().await,
    };
    let gridlab = state.gridlab.clone();
    let result = blocking(move || gridlab.clean(&data)).await?;

    if request.apply {
        state.replace(result.data.clone()).await;
    }

    Ok(Json(CleanResponse {
        processed_data: result.data,
        outliers: result.outliers,
        imputed: result.imputed,
        standardized: result.standardized,
    }))
}
