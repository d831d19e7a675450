//! The cleaning pass: outliers, format standardization and imputation.

use indexmap::IndexMap;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::inference::{median, percentile};
use crate::input::{Cell, Dataset};
use crate::schema::RuleKind;
use crate::validation::{RuleDetector, ValidationConfig, ValidationRule};

use super::operations::{CellChange, ChangeKind, CleaningResult};

static DATE_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,4})[-./](\d{1,2})[-./](\d{1,4})$").expect("valid date regex"));

/// Which cleaning steps run and how outliers are fenced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Fence width in interquartile ranges.
    pub iqr_multiplier: f64,
    pub standardize_dates: bool,
    pub normalize_emails: bool,
    pub impute_missing: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            standardize_dates: true,
            normalize_emails: true,
            impute_missing: true,
        }
    }
}

/// Applies the cleaning pass to a copy of a dataset.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleaningConfig,
    detector: RuleDetector,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CleaningConfig, validation: ValidationConfig) -> Self {
        Self {
            config,
            detector: RuleDetector::with_config(validation),
        }
    }

    /// Clean a copy of `data`.
    pub fn clean(&self, data: &Dataset) -> CleaningResult {
        let rules = self.detector.detect(data);
        let mut cleaned = data.clone();

        let outliers = self.find_outliers(&cleaned, &rules);

        let mut standardized = Vec::new();
        for (column, rule) in &rules {
            match rule.kind {
                RuleKind::Date if self.config.standardize_dates => {
                    standardized.extend(standardize_dates(&mut cleaned, column));
                }
                RuleKind::Email if self.config.normalize_emails => {
                    standardized.extend(normalize_emails(&mut cleaned, column));
                }
                _ => {}
            }
        }

        let mut imputed = Vec::new();
        if self.config.impute_missing {
            for (column, rule) in &rules {
                imputed.extend(impute_column(&mut cleaned, column, rule));
            }
        }

        info!(
            "cleaned {} rows: {} outliers, {} standardized, {} imputed",
            cleaned.row_count(),
            outliers.values().map(Vec::len).sum::<usize>(),
            standardized.len(),
            imputed.len()
        );

        CleaningResult {
            data: cleaned,
            outliers,
            imputed,
            standardized,
        }
    }

    /// Row indices outside `[Q1 - k*IQR, Q3 + k*IQR]` for each numeric column.
    pub fn find_outliers(
        &self,
        data: &Dataset,
        rules: &IndexMap<String, ValidationRule>,
    ) -> IndexMap<String, Vec<usize>> {
        let mut outliers = IndexMap::new();

        for (column, rule) in rules {
            if !rule.is_numeric {
                continue;
            }

            let values: Vec<f64> = data.present_values(column).map(Cell::to_number).collect();
            let (Some(q1), Some(q3)) = (percentile(&values, 25.0), percentile(&values, 75.0)) else {
                continue;
            };
            let iqr = q3 - q1;
            let lower = q1 - self.config.iqr_multiplier * iqr;
            let upper = q3 + self.config.iqr_multiplier * iqr;

            let rows: Vec<usize> = data
                .column_values(column)
                .enumerate()
                .filter_map(|(idx, cell)| {
                    let n = cell.filter(|c| !c.is_missing())?.to_number();
                    (n < lower || n > upper).then_some(idx)
                })
                .collect();

            if !rows.is_empty() {
                debug!("column '{}': {} outliers outside [{}, {}]", column, rows.len(), lower, upper);
                outliers.insert(column.clone(), rows);
            }
        }

        outliers
    }
}

/// Reformat `a-b-c` style dates as `YYYY-MM-DD`.
///
/// A four-digit first group is the year (`yyyy-mm-dd`), a four-digit last
/// group is the year of a `dd-mm-yyyy` date, and anything else is read as
/// `mm-dd-yy`. The year is kept as written.
pub fn standardize_date(value: &str) -> Option<String> {
    let caps = DATE_PARTS.captures(value.trim())?;
    let parts = [&caps[1], &caps[2], &caps[3]];

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else {
        (parts[2], parts[0], parts[1])
    };

    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    Some(format!("{}-{:02}-{:02}", year, month, day))
}

fn standardize_dates(data: &mut Dataset, column: &str) -> Vec<CellChange> {
    rewrite_text(data, column, ChangeKind::DateFormat, standardize_date)
}

fn normalize_emails(data: &mut Dataset, column: &str) -> Vec<CellChange> {
    rewrite_text(data, column, ChangeKind::EmailCase, |s| {
        Some(s.trim().to_lowercase())
    })
}

/// Apply `rewrite` to every non-empty text cell of a column, recording the
/// cells whose value actually changed.
fn rewrite_text(
    data: &mut Dataset,
    column: &str,
    kind: ChangeKind,
    rewrite: impl Fn(&str) -> Option<String>,
) -> Vec<CellChange> {
    let mut changes = Vec::new();

    for (idx, row) in data.rows.iter_mut().enumerate() {
        let Some(Cell::Text(current)) = row.get_mut(column) else {
            continue;
        };
        if current.is_empty() {
            continue;
        }
        let Some(updated) = rewrite(current) else {
            continue;
        };
        if updated == *current {
            continue;
        }

        let original = std::mem::replace(current, updated.clone());
        changes.push(CellChange {
            row: idx,
            column: column.to_string(),
            original: Some(Cell::Text(original)),
            new: Cell::Text(updated),
            kind,
        });
    }

    changes
}

/// Fill missing cells: numeric columns with the median, others with the mode.
fn impute_column(data: &mut Dataset, column: &str, rule: &ValidationRule) -> Vec<CellChange> {
    let fill = if rule.is_numeric {
        let numbers: Vec<f64> = data
            .present_values(column)
            .map(Cell::to_number)
            .filter(|n| n.is_finite())
            .collect();
        if numbers.is_empty() {
            return Vec::new();
        }
        (Cell::Number(median(&numbers)), ChangeKind::MedianFill)
    } else {
        match mode(data, column) {
            Some(cell) => (cell, ChangeKind::ModeFill),
            None => return Vec::new(),
        }
    };

    let (value, kind) = fill;
    let mut changes = Vec::new();
    for (idx, row) in data.rows.iter_mut().enumerate() {
        if !Cell::is_missing_opt(row.get(column)) {
            continue;
        }
        let original = row.insert(column.to_string(), value.clone());
        changes.push(CellChange {
            row: idx,
            column: column.to_string(),
            original,
            new: value.clone(),
            kind,
        });
    }
    changes
}

/// The most frequent non-missing value; ties go to the first encountered.
fn mode(data: &Dataset, column: &str) -> Option<Cell> {
    let mut counts: IndexMap<String, (usize, &Cell)> = IndexMap::new();
    for cell in data.present_values(column) {
        counts.entry(cell.to_string()).or_insert((0, cell)).0 += 1;
    }

    let mut best: Option<(usize, &Cell)> = None;
    for (count, cell) in counts.values() {
        if best.is_none_or(|(top, _)| *count > top) {
            best = Some((*count, *cell));
        }
    }
    best.map(|(_, cell)| cell.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_date_layouts() {
        assert_eq!(standardize_date("2024/3/5"), Some("2024-03-05".to_string()));
        assert_eq!(standardize_date("15.03.2024"), Some("2024-03-15".to_string()));
        assert_eq!(standardize_date("3-15-24"), Some("24-03-15".to_string()));
        assert_eq!(standardize_date("March 5"), None);
    }

    #[test]
    fn test_outliers_are_reported_not_removed() {
        let mut rows: Vec<Vec<Cell>> = (1..=10).map(|i| vec![Cell::Number(i as f64)]).collect();
        rows.push(vec![Cell::Number(1000.0)]);
        let data = Dataset::from_columns(&["v"], rows);

        let result = Cleaner::new().clean(&data);
        assert_eq!(result.outliers["v"], vec![10]);
        assert_eq!(result.data.row_count(), 11);
        assert_eq!(result.outlier_count(), 1);
    }

    #[test]
    fn test_numeric_imputation_uses_median() {
        let data = Dataset::from_columns(
            &["v"],
            vec![
                vec![Cell::Number(1.0)],
                vec![Cell::Null],
                vec![Cell::Number(3.0)],
                vec![Cell::Number(10.0)],
                vec![Cell::Number(4.0)],
            ],
        );
        let result = Cleaner::new().clean(&data);
        assert_eq!(result.data.get(1, "v"), Some(&Cell::Number(3.5)));
        assert_eq!(result.imputed.len(), 1);
        assert_eq!(result.imputed[0].kind, ChangeKind::MedianFill);
        assert_eq!(result.imputed[0].original, Some(Cell::Null));
        // The input is untouched.
        assert_eq!(data.get(1, "v"), Some(&Cell::Null));
    }

    #[test]
    fn test_categorical_imputation_uses_mode() {
        let data = Dataset::from_columns(
            &["c"],
            ["b", "a", "", "a", "b", "c", "a", "b"]
                .iter()
                .map(|&v| vec![Cell::text(v)])
                .collect(),
        );
        let result = Cleaner::new().clean(&data);
        // a and b tie at three; b was seen first.
        assert_eq!(result.data.get(2, "c"), Some(&Cell::text("b")));
        assert_eq!(result.imputed[0].kind, ChangeKind::ModeFill);
    }

    #[test]
    fn test_emails_are_normalized() {
        let data = Dataset::from_columns(
            &["mail"],
            vec![
                vec![Cell::text(" Ann@Example.COM ")],
                vec![Cell::text("bob@example.com")],
            ],
        );
        let result = Cleaner::new().clean(&data);
        assert_eq!(result.data.get(0, "mail"), Some(&Cell::text("ann@example.com")));
        assert_eq!(result.standardized.len(), 1);
        assert_eq!(result.standardized[0].kind, ChangeKind::EmailCase);
    }

    #[test]
    fn test_date_column_is_standardized() {
        let data = Dataset::from_columns(
            &["d"],
            vec![
                vec![Cell::text("2024/01/02")],
                vec![Cell::text("03.02.2024")],
                vec![Cell::text("2024-01-05")],
            ],
        );
        let result = Cleaner::new().clean(&data);
        let dates: Vec<String> = result
            .data
            .column_values("d")
            .map(Cell::display_of)
            .collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-02-03", "2024-01-05"]);
        assert_eq!(result.standardized.len(), 2);
        assert_eq!(result.changes_by_column()["d"], 2);
    }

    #[test]
    fn test_disabled_steps_do_nothing() {
        let config = CleaningConfig {
            impute_missing: false,
            normalize_emails: false,
            ..CleaningConfig::default()
        };
        let data = Dataset::from_columns(
            &["mail"],
            vec![vec![Cell::text("A@B.IO")], vec![Cell::text("")], vec![Cell::text("c@d.io")]],
        );
        let result = Cleaner::with_config(config, ValidationConfig::default()).clean(&data);
        assert_eq!(result.cells_changed(), 0);
        assert_eq!(result.data, data);
    }
}
