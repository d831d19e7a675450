//! Data import handler.

use axum::{Json, extract::State};
use gridlab::{Dataset, InputFormat};
use log::info;
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Body of `POST /api/import-data`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Raw file contents.
    pub content: String,
    /// `csv` or `json`; guessed from the content when absent.
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub data: Dataset,
    pub columns: Vec<String>,
    pub row_count: usize,
}

fn input_format(request: &ImportRequest) -> Result<InputFormat, ApiError> {
    match request.format.as_deref().map(str::to_lowercase).as_deref() {
        Some("csv" | "tsv" | "txt") => Ok(InputFormat::Delimited),
        Some("json") => Ok(InputFormat::Json),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unsupported import format '{}'. Use csv or json.",
            other
        ))),
        None => {
            let trimmed = request.content.trim_start();
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                Ok(InputFormat::Json)
            } else {
                Ok(InputFormat::Delimited)
            }
        }
    }
}

/// Parse uploaded text and make it the served dataset.
pub async fn import_data(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let format = input_format(&request)?;
    let data = state.gridlab.load_str(&request.content, format)?;

    info!("imported {} rows over the API", data.row_count());

    let response = ImportResponse {
        columns: data.columns().into_iter().map(String::from).collect(),
        row_count: data.row_count(),
        data: data.clone(),
    };
    state.replace(data).await;
    Ok(Json(response))
}
