//! Missing-value analysis per column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset};
use crate::schema::{ColumnQuality, QualityStatus};

/// Cut-offs for rating a column's completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// A column whose missing ratio exceeds this is rated poor.
    pub poor_missing_ratio: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            poor_missing_ratio: 0.2,
        }
    }
}

impl QualityThresholds {
    /// Rate a column from its missing count.
    pub fn status(&self, missing: usize, total: usize) -> QualityStatus {
        if missing == 0 || total == 0 {
            QualityStatus::Good
        } else if missing as f64 / total as f64 > self.poor_missing_ratio {
            QualityStatus::Poor
        } else {
            QualityStatus::Fair
        }
    }
}

/// Compute missing counts and a status for every column of the first row.
pub fn analyze_quality(
    data: &Dataset,
    thresholds: &QualityThresholds,
) -> IndexMap<String, ColumnQuality> {
    let total = data.row_count();

    data.columns()
        .into_iter()
        .map(|name| {
            let missing_count = data
                .column_values(name)
                .filter(|cell| Cell::is_missing_opt(*cell))
                .count();
            let missing_percentage = if total == 0 {
                0.0
            } else {
                missing_count as f64 / total as f64 * 100.0
            };

            (
                name.to_string(),
                ColumnQuality {
                    missing_count,
                    missing_percentage,
                    status: thresholds.status(missing_count, total),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_percent_missing_is_poor() {
        let rows = (0..10)
            .map(|i| {
                vec![
                    Cell::Number(i as f64),
                    if i < 3 { Cell::Null } else { Cell::text("ok") },
                ]
            })
            .collect();
        let data = Dataset::from_columns(&["a", "b"], rows);

        let quality = analyze_quality(&data, &QualityThresholds::default());
        let b = &quality["b"];
        assert_eq!(b.missing_count, 3);
        assert!((b.missing_percentage - 30.0).abs() < 1e-9);
        assert_eq!(b.status, QualityStatus::Poor);
        assert_eq!(quality["a"].status, QualityStatus::Good);
    }

    #[test]
    fn test_fair_and_boundary() {
        let thresholds = QualityThresholds::default();
        assert_eq!(thresholds.status(1, 10), QualityStatus::Fair);
        // Exactly 20% is not above the cut-off.
        assert_eq!(thresholds.status(2, 10), QualityStatus::Fair);
        assert_eq!(thresholds.status(0, 10), QualityStatus::Good);
    }

    #[test]
    fn test_zero_false_and_whitespace_are_present() {
        let data = Dataset::from_columns(
            &["v"],
            vec![
                vec![Cell::Number(0.0)],
                vec![Cell::Bool(false)],
                vec![Cell::text("  ")],
                vec![Cell::text("")],
            ],
        );
        let quality = analyze_quality(&data, &QualityThresholds::default());
        assert_eq!(quality["v"].missing_count, 1);
    }

    #[test]
    fn test_absent_key_is_missing() {
        let mut data = Dataset::from_columns(&["a", "b"], vec![vec![Cell::Number(1.0), Cell::Number(2.0)]]);
        let mut short = crate::input::Row::new();
        short.insert("a".to_string(), Cell::Number(3.0));
        data.rows.push(short);

        let quality = analyze_quality(&data, &QualityThresholds::default());
        assert_eq!(quality["b"].missing_count, 1);
        assert_eq!(quality["b"].status, QualityStatus::Poor);
    }
}
