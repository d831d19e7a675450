//! Records of what a cleaning pass changed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset};

/// Why a cell was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Date reformatted to `YYYY-MM-DD`.
    DateFormat,
    /// Email trimmed and lower-cased.
    EmailCase,
    /// Missing value filled with the column median.
    MedianFill,
    /// Missing value filled with the column's most frequent value.
    ModeFill,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::DateFormat => "date format",
            ChangeKind::EmailCase => "email case",
            ChangeKind::MedianFill => "median fill",
            ChangeKind::ModeFill => "mode fill",
        }
    }
}

/// Audit entry for a single rewritten cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellChange {
    /// Row index (0-based).
    pub row: usize,
    pub column: String,
    /// Value before cleaning; `None` when the key was absent.
    pub original: Option<Cell>,
    pub new: Cell,
    pub kind: ChangeKind,
}

/// Output of [`Cleaner::clean`](super::Cleaner::clean).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningResult {
    /// The cleaned copy; the input dataset is left untouched.
    pub data: Dataset,
    /// Row indices of IQR outliers per numeric column. Reported, not removed.
    pub outliers: IndexMap<String, Vec<usize>>,
    pub imputed: Vec<CellChange>,
    pub standardized: Vec<CellChange>,
}

impl CleaningResult {
    /// Total number of outlier cells across columns.
    pub fn outlier_count(&self) -> usize {
        self.outliers.values().map(Vec::len).sum()
    }

    /// Number of cells rewritten by standardization or imputation.
    pub fn cells_changed(&self) -> usize {
        self.imputed.len() + self.standardized.len()
    }

    /// Changed-cell counts per column, in first-change order.
    pub fn changes_by_column(&self) -> IndexMap<&str, usize> {
        let mut counts = IndexMap::new();
        for change in self.standardized.iter().chain(&self.imputed) {
            *counts.entry(change.column.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
