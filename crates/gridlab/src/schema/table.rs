//! Table-level profile combining the per-column results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::{ColumnQuality, ColumnStatistics};
use super::types::{ColumnType, QualityStatus};

/// Everything known about one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Zero-based position in the first row.
    pub position: usize,
    pub column_type: ColumnType,
    pub quality: ColumnQuality,
    pub statistics: ColumnStatistics,
}

/// Profile of an entire table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableProfile {
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    /// Zip the separately computed maps into column profiles.
    ///
    /// The type map drives the column order; columns missing from the other
    /// maps get default entries.
    pub fn assemble(
        row_count: usize,
        types: &IndexMap<String, ColumnType>,
        quality: &IndexMap<String, ColumnQuality>,
        statistics: &IndexMap<String, ColumnStatistics>,
    ) -> Self {
        let columns = types
            .iter()
            .enumerate()
            .map(|(position, (name, column_type))| ColumnProfile {
                name: name.clone(),
                position,
                column_type: *column_type,
                quality: quality.get(name).cloned().unwrap_or(ColumnQuality {
                    missing_count: 0,
                    missing_percentage: 0.0,
                    status: QualityStatus::Good,
                }),
                statistics: statistics.get(name).cloned().unwrap_or_default(),
            })
            .collect();

        Self { row_count, columns }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns rated with the given status.
    pub fn columns_with_status(
        &self,
        status: QualityStatus,
    ) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(move |c| c.quality.status == status)
    }

    /// Total missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.quality.missing_count).sum()
    }
}
