//! Error types for the gridlab library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gridlab operations.
#[derive(Debug, Error)]
pub enum GridlabError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File format or document shape not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Export could not be produced with the given options.
    #[error("Export error: {0}")]
    Export(String),

    /// Error assembling a zip archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error building an Excel workbook.
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Error building Arrow arrays for parquet output.
    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error writing parquet output.
    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A column referenced by name does not exist in the dataset.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

impl GridlabError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GridlabError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for gridlab operations.
pub type Result<T> = std::result::Result<T, GridlabError>;
