//! The interactive grid: search, column filters, sorting, pagination and
//! chart helpers over an in-memory dataset.

pub mod charts;
pub mod pipeline;
pub mod query;

pub use charts::{Aggregation, ChartKind, aggregate, group_aggregate, suggest_charts};
pub use pipeline::{GridPage, filter_and_sort, row_matches_search, run_query};
pub use query::{ColumnFilter, FilterOperator, GridQuery, SortConfig, SortDirection};
