//! Derived column information: types, completeness and statistics.

mod quality;
mod statistical;
mod types;

pub use quality::{QualityThresholds, analyze_quality};
pub use statistical::{
    StatisticsConfig, column_statistics, compute_statistics, histogram, median,
    numeric_statistics, percentile,
};
pub use types::{classify_value, infer_column_types, parse_timestamp};
