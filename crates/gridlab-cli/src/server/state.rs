//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use gridlab::{Dataset, Gridlab, SourceMetadata};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The dataset the grid currently shows.
    pub dataset: Arc<RwLock<Dataset>>,
    /// Where the dataset came from; None once it is replaced over the API.
    pub source: Arc<RwLock<Option<SourceMetadata>>>,
    pub gridlab: Arc<Gridlab>,
}

impl AppState {
    /// Create new application state.
    pub fn new(gridlab: Gridlab, dataset: Dataset, source: Option<SourceMetadata>) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
            source: Arc::new(RwLock::new(source)),
            gridlab: Arc::new(gridlab),
        }
    }

    /// Copy of the current dataset; the read lock is held only for the clone.
    pub async fn snapshot(&self) -> Dataset {
        self.dataset.read().await.clone()
    }

    /// Swap in a new dataset, dropping the file metadata of the old one.
    pub async fn replace(&self, dataset: Dataset) {
        *self.dataset.write().await = dataset;
        *self.source.write().await = None;
    }
}
