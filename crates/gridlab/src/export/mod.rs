//! Exporting datasets to files: JSON, JSON Lines, CSV, SQL, Excel, parquet
//! (with the `parquet` feature), zipped train/test splits and full bundles.

mod archive;
mod formats;
#[cfg(feature = "parquet")]
mod columnar;
mod workbook;
mod writers;

pub use formats::{ContentEncoding, ExportArtifact, ExportFile, ExportFormat, ExportOptions};
#[cfg(feature = "parquet")]
pub use columnar::to_parquet;
pub use workbook::to_xlsx;
pub use writers::{Exporter, to_csv, to_jsonl, to_sql};
