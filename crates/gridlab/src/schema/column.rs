//! Per-column quality and statistics records.

use serde::{Deserialize, Serialize};

use super::types::QualityStatus;

/// Missing-value summary for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    /// Number of null/undefined/empty-string values.
    pub missing_count: usize,
    /// `missing_count` as a percentage of all rows.
    pub missing_percentage: f64,
    pub status: QualityStatus,
}

/// Statistics computed for a column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// Number of non-missing values.
    pub count: usize,
    /// Number of distinct non-missing values.
    pub unique: usize,
    /// Most frequent display values with their counts, most frequent first.
    pub most_common: Vec<(String, usize)>,
    /// Numeric statistics (for Number columns).
    #[serde(flatten)]
    pub numeric: Option<NumericStatistics>,
    /// Five-bin distribution (for Number columns).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
}

/// Statistics for numeric columns.
///
/// NaN is a legitimate value here: a non-numeric cell inside a Number column
/// propagates NaN into `min`, `max` and `avg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Equal-width histogram over a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bins: Vec<usize>,
}

impl Histogram {
    /// Height of each bin relative to the tallest one (0.0-1.0).
    pub fn relative_heights(&self) -> Vec<f64> {
        let tallest = self.bins.iter().copied().max().unwrap_or(0);
        if tallest == 0 {
            return vec![0.0; self.bins.len()];
        }
        self.bins
            .iter()
            .map(|&b| b as f64 / tallest as f64)
            .collect()
    }

    /// Render as a one-line bar sparkline.
    pub fn sparkline(&self) -> String {
        const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        self.relative_heights()
            .into_iter()
            .map(|h| {
                if h == 0.0 {
                    ' '
                } else {
                    BARS[((h * 7.0).round() as usize).min(7)]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_heights() {
        let hist = Histogram {
            min: 0.0,
            max: 10.0,
            bins: vec![1, 4, 2, 0, 4],
        };
        assert_eq!(hist.relative_heights(), vec![0.25, 1.0, 0.5, 0.0, 1.0]);
        assert_eq!(hist.sparkline().chars().count(), 5);
    }

    #[test]
    fn test_empty_histogram() {
        let hist = Histogram {
            min: 0.0,
            max: 0.0,
            bins: vec![0; 5],
        };
        assert_eq!(hist.relative_heights(), vec![0.0; 5]);
    }
}
