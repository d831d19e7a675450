//! API request handlers.

use crate::server::error::ApiError;

mod charts;
mod clean;
mod data;
mod export;
mod import;
mod profile;

pub use charts::*;
pub use clean::*;
pub use data::*;
pub use export::*;
pub use import::*;
pub use profile::*;

/// Run CPU-bound work on the blocking pool, off the async workers.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker task failed: {}", e)))
}
