//! Statistics and validation handlers.

use axum::{Json, extract::State};
use gridlab::{Profile, ValidationReport};

use super::blocking;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Types, quality, statistics and validation of the served dataset.
pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<Profile>, ApiError> {
    let data = state.snapshot().await;
    let gridlab = state.gridlab.clone();

    let mut profile = blocking(move || gridlab.profile_dataset(&data)).await?;
    profile.source = state.source.read().await.clone();
    Ok(Json(profile))
}

pub async fn get_validation(
    State(state): State<AppState>,
) -> Result<Json<ValidationReport>, ApiError> {
    let data = state.snapshot().await;
    let gridlab = state.gridlab.clone();

    Ok(Json(blocking(move || gridlab.validate(&data)).await?))
}
