//! Export handler.

use axum::{Json, extract::State};
use gridlab::{Dataset, ExportArtifact, ExportFormat, ExportOptions, Exporter};
use serde::Deserialize;

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Body of `POST /api/export-data`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: String,
    /// Rows to export; the served dataset when absent.
    #[serde(default)]
    pub data: Option<Dataset>,
    /// Overrides the configured export options.
    #[serde(default)]
    pub options: Option<ExportOptions>,
}

pub async fn export_data(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportArtifact>, ApiError> {
    let format: ExportFormat = request.format.parse()?;
    let exporter = Exporter::with_options(
        request
            .options
            .unwrap_or_else(|| state.gridlab.config().export.clone()),
    );

    let data = match request.data {
        Some(data) => data,
        None => state.snapshot().await,
    };

    let artifact = blocking(move || exporter.export(&data, format)).await??;
    Ok(Json(artifact))
}
