//! Data cleaning: outlier detection, format standardization and imputation.

mod engine;
mod operations;

pub use engine::{Cleaner, CleaningConfig, standardize_date};
pub use operations::{CellChange, ChangeKind, CleaningResult};
