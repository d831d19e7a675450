//! Per-cell validation against detected rules and the resulting report.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset};

use super::rules::{RuleDetector, ValidationConfig, ValidationRule};

/// A cell that does not conform to its column's rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellIssue {
    /// Zero-based row index.
    pub row: usize,
    pub column: String,
    pub value: Cell,
    /// What the column expects, e.g. "email address".
    pub expected: String,
}

/// Outcome of validating a whole dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rules: IndexMap<String, ValidationRule>,
    pub issues: Vec<CellIssue>,
    pub total_records: usize,
    /// Rows with at least one invalid cell.
    pub records_with_issues: usize,
    pub total_missing_values: usize,
    pub total_invalid_values: usize,
    /// Non-missing cells as a percentage of all cells.
    pub completeness: f64,
    /// Valid cells as a percentage of non-missing cells.
    pub accuracy: f64,
    /// Mean of completeness and accuracy.
    pub quality_score: f64,
    pub passed: bool,
}

impl ValidationReport {
    /// Issues of a single column.
    pub fn issues_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellIssue> + 'a {
        self.issues.iter().filter(move |i| i.column == column)
    }

    /// Whether the given cell was flagged.
    pub fn is_flagged(&self, row: usize, column: &str) -> bool {
        self.issues.iter().any(|i| i.row == row && i.column == column)
    }
}

/// Detects rules and checks every cell against them.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    detector: RuleDetector,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            detector: RuleDetector::with_config(config),
        }
    }

    /// Validate the dataset with freshly detected rules.
    pub fn validate(&self, data: &Dataset) -> ValidationReport {
        let rules = self.detector.detect(data);
        self.validate_with_rules(data, rules)
    }

    /// Validate against rules computed elsewhere.
    pub fn validate_with_rules(
        &self,
        data: &Dataset,
        rules: IndexMap<String, ValidationRule>,
    ) -> ValidationReport {
        let config = self.detector.config();
        let mut issues = Vec::new();
        let mut flagged_rows = BTreeSet::new();
        let mut missing = 0usize;
        let mut present = 0usize;

        for (idx, row) in data.rows.iter().enumerate() {
            for (column, rule) in &rules {
                let value = row.get(column);
                let Some(cell) = value.filter(|c| !c.is_missing()) else {
                    missing += 1;
                    continue;
                };
                present += 1;

                if !rule.check(cell) {
                    flagged_rows.insert(idx);
                    issues.push(CellIssue {
                        row: idx,
                        column: column.clone(),
                        value: cell.clone(),
                        expected: rule.kind.description().to_string(),
                    });
                }
            }
        }

        let total_cells = missing + present;
        let completeness = percentage(present, total_cells);
        let accuracy = percentage(present - issues.len(), present);
        let quality_score = (completeness + accuracy) / 2.0;
        let passed = completeness >= config.completeness_pass && accuracy >= config.accuracy_pass;

        debug!(
            "validated {} cells: {} missing, {} invalid, score {:.1}",
            total_cells,
            missing,
            issues.len(),
            quality_score
        );

        ValidationReport {
            rules,
            total_records: data.row_count(),
            records_with_issues: flagged_rows.len(),
            total_missing_values: missing,
            total_invalid_values: issues.len(),
            issues,
            completeness,
            accuracy,
            quality_score,
            passed,
        }
    }
}

/// `part / whole * 100`, or 100 when there is nothing to measure.
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;
    use crate::schema::RuleKind;

    #[test]
    fn test_email_column_flags_bad_value() {
        let mut rows: Vec<Vec<Cell>> = (0..85)
            .map(|i| vec![Cell::text(format!("user{}@example.com", i))])
            .collect();
        rows.extend((0..15).map(|_| vec![Cell::text("not-an-email")]));
        let data = Dataset::from_columns(&["email"], rows);

        let report = Validator::new().validate(&data);
        assert_eq!(report.rules["email"].kind, RuleKind::Email);
        assert_eq!(report.total_invalid_values, 15);
        assert_eq!(report.records_with_issues, 15);
        assert!(report.is_flagged(90, "email"));
        assert!(!report.is_flagged(0, "email"));
        assert!((report.accuracy - 85.0).abs() < 1e-9);
        assert!((report.completeness - 100.0).abs() < 1e-9);
        assert!((report.quality_score - 92.5).abs() < 1e-9);
        assert!(!report.passed);
    }

    #[test]
    fn test_two_row_csv_is_complete() {
        let data = Parser::new().parse_csv_str("id,name\n1,Ann\n2,Bob\n").unwrap();
        let report = Validator::new().validate(&data);
        assert_eq!(report.completeness, 100.0);
        assert_eq!(report.total_records, 2);
        assert!(report.issues.is_empty());
        assert!(report.passed);
    }

    #[test]
    fn test_empty_dataset_scores_full() {
        let report = Validator::new().validate(&Dataset::default());
        assert_eq!(report.completeness, 100.0);
        assert_eq!(report.accuracy, 100.0);
        assert_eq!(report.quality_score, 100.0);
        assert_eq!(report.total_records, 0);
    }

    #[test]
    fn test_missing_cells_lower_completeness() {
        let data = Dataset::from_columns(
            &["a", "b"],
            vec![
                vec![Cell::Number(1.0), Cell::text("x")],
                vec![Cell::Null, Cell::text("")],
            ],
        );
        let report = Validator::new().validate(&data);
        assert_eq!(report.total_missing_values, 2);
        assert_eq!(report.completeness, 50.0);
        assert_eq!(report.issues_for("a").count(), 0);
    }

    #[test]
    fn test_records_counted_once() {
        let mut rows: Vec<Vec<Cell>> = (0..9)
            .map(|i| vec![Cell::Number(i as f64), Cell::text(format!("u{}@x.io", i))])
            .collect();
        rows.push(vec![Cell::text("n/a"), Cell::text("nobody")]);
        let data = Dataset::from_columns(&["n", "mail"], rows);

        let report = Validator::new().validate(&data);
        assert_eq!(report.total_invalid_values, 2);
        assert_eq!(report.records_with_issues, 1);
        assert_eq!(report.issues[0].expected, "number");
    }
}
