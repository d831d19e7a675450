//! Schema types for representing derived table structure.

mod column;
mod table;
mod types;

pub use column::{ColumnQuality, ColumnStatistics, Histogram, NumericStatistics};
pub use table::{ColumnProfile, TableProfile};
pub use types::{ColumnType, QualityStatus, RuleKind};
