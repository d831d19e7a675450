//! Statistical aggregation over dataset columns.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset};
use crate::schema::{ColumnStatistics, ColumnType, Histogram, NumericStatistics};

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for mean and variance in a single pass. NaN is
// sticky: once seen, min/max/mean/variance all report NaN.

#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
    saw_nan: bool,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            saw_nan: false,
        }
    }

    fn add(&mut self, value: f64) {
        if value.is_nan() {
            self.saw_nan = true;
        }
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Population variance (divides by N).
    fn variance(&self) -> f64 {
        if self.saw_nan || self.count == 0 {
            f64::NAN
        } else {
            self.m2 / self.count as f64
        }
    }

    fn min(&self) -> f64 {
        if self.saw_nan { f64::NAN } else { self.min }
    }

    fn max(&self) -> f64 {
        if self.saw_nan { f64::NAN } else { self.max }
    }

    fn mean(&self) -> f64 {
        if self.saw_nan || self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }
}

/// Settings for the statistics aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// How many entries to keep in `most_common`.
    pub top_n: usize,
    /// Number of histogram bins for numeric columns.
    pub histogram_bins: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            histogram_bins: 5,
        }
    }
}

/// Compute statistics for every column in the type map.
pub fn compute_statistics(
    data: &Dataset,
    types: &IndexMap<String, ColumnType>,
    config: &StatisticsConfig,
) -> IndexMap<String, ColumnStatistics> {
    types
        .iter()
        .map(|(name, column_type)| {
            (
                name.clone(),
                column_statistics(data, name, *column_type, config),
            )
        })
        .collect()
}

/// Compute statistics for a single column.
pub fn column_statistics(
    data: &Dataset,
    name: &str,
    column_type: ColumnType,
    config: &StatisticsConfig,
) -> ColumnStatistics {
    let values: Vec<&Cell> = data.present_values(name).collect();

    let mut distinct: HashSet<(u8, String)> = HashSet::new();
    let mut frequency: IndexMap<String, usize> = IndexMap::new();
    for value in &values {
        let display = value.to_string();
        distinct.insert((kind_tag(value), display.clone()));
        *frequency.entry(display).or_insert(0) += 1;
    }

    // Stable sort keeps encounter order among equal counts.
    let mut most_common: Vec<(String, usize)> = frequency.into_iter().collect();
    most_common.sort_by(|a, b| b.1.cmp(&a.1));
    most_common.truncate(config.top_n);

    let (numeric, histogram) = if column_type.is_numeric() {
        let numbers: Vec<f64> = values.iter().map(|v| v.to_number()).collect();
        (
            numeric_statistics(&numbers),
            histogram(&numbers, config.histogram_bins),
        )
    } else {
        (None, None)
    };

    ColumnStatistics {
        count: values.len(),
        unique: distinct.len(),
        most_common,
        numeric,
        histogram,
    }
}

/// Distinguishes `1` from `"1"` when counting distinct values.
fn kind_tag(cell: &Cell) -> u8 {
    match cell {
        Cell::Null => 0,
        Cell::Bool(_) => 1,
        Cell::Number(_) => 2,
        Cell::Text(_) => 3,
    }
}

/// Min, max, mean, median and population standard deviation.
pub fn numeric_statistics(values: &[f64]) -> Option<NumericStatistics> {
    if values.is_empty() {
        return None;
    }

    let mut stats = StreamingStats::new();
    for &value in values {
        stats.add(value);
    }

    Some(NumericStatistics {
        min: stats.min(),
        max: stats.max(),
        avg: stats.mean(),
        median: median(values),
        std_dev: stats.variance().sqrt(),
    })
}

/// Exact median; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Linear-interpolated percentile (0-100) over finite values.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Equal-width histogram over the finite values; the last bin is closed.
///
/// A zero-width range puts every value in the first bin. Offsets are taken
/// on halved values so ranges wider than `f64::MAX` still spread.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return None;
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let half_span = max / 2.0 - min / 2.0;

    let mut counts = vec![0usize; bins];
    for value in finite {
        let idx = if half_span > 0.0 {
            let fraction = (value / 2.0 - min / 2.0) / half_span;
            ((fraction * bins as f64).floor() as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    Some(Histogram {
        min,
        max,
        bins: counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Dataset {
        Dataset::from_columns(
            &["n"],
            values.iter().map(|&v| vec![Cell::Number(v)]).collect(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_numeric_column_statistics() {
        let data = numbers(&[1.0, 2.0, 3.0, 4.0]);
        let stats = column_statistics(&data, "n", ColumnType::Number, &StatisticsConfig::default());

        let numeric = stats.numeric.expect("numeric stats");
        assert_eq!(numeric.min, 1.0);
        assert_eq!(numeric.max, 4.0);
        assert!(approx(numeric.avg, 2.5));
        assert!(approx(numeric.median, 2.5));
        assert!(approx(numeric.std_dev, 1.25f64.sqrt()));
        assert_eq!(stats.count, 4);
        assert_eq!(stats.unique, 4);
    }

    #[test]
    fn test_string_column_has_no_numeric_stats() {
        let data = Dataset::from_columns(
            &["s"],
            vec![vec![Cell::text("a")], vec![Cell::text("b")]],
        );
        let stats = column_statistics(&data, "s", ColumnType::String, &StatisticsConfig::default());
        assert!(stats.numeric.is_none());
        assert!(stats.histogram.is_none());
    }

    #[test]
    fn test_most_common_ties_keep_encounter_order() {
        let data = Dataset::from_columns(
            &["c"],
            ["x", "y", "y", "z", "x", "w", "z"]
                .iter()
                .map(|&v| vec![Cell::text(v)])
                .collect(),
        );
        let stats = column_statistics(&data, "c", ColumnType::String, &StatisticsConfig::default());
        assert_eq!(
            stats.most_common,
            vec![
                ("x".to_string(), 2),
                ("y".to_string(), 2),
                ("z".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_unique_distinguishes_number_and_text() {
        let data = Dataset::from_columns(
            &["c"],
            vec![
                vec![Cell::Number(1.0)],
                vec![Cell::text("1")],
                vec![Cell::Null],
            ],
        );
        let stats = column_statistics(&data, "c", ColumnType::Number, &StatisticsConfig::default());
        assert_eq!(stats.count, 2);
        assert_eq!(stats.unique, 2);
        // Frequencies are keyed by display string.
        assert_eq!(stats.most_common, vec![("1".to_string(), 2)]);
    }

    #[test]
    fn test_nan_propagates() {
        let data = Dataset::from_columns(
            &["c"],
            vec![vec![Cell::Number(1.0)], vec![Cell::text("oops")]],
        );
        let stats = column_statistics(&data, "c", ColumnType::Number, &StatisticsConfig::default());
        let numeric = stats.numeric.expect("numeric stats");
        assert!(numeric.min.is_nan());
        assert!(numeric.max.is_nan());
        assert!(numeric.avg.is_nan());
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(4.0));
        assert!(approx(percentile(&values, 25.0).unwrap(), 1.75));
    }

    #[test]
    fn test_histogram_bins() {
        let hist = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 10.0], 5).unwrap();
        assert_eq!(hist.bins, vec![2, 2, 2, 0, 1]);
        assert_eq!(hist.bins.iter().sum::<usize>(), 7);
    }

    #[test]
    fn test_histogram_spans_wider_than_f64_max() {
        let hist = histogram(&[-1e308, -6e307, 1e307, 6e307, 1e308], 4).unwrap();
        assert_eq!(hist.bins, vec![2, 0, 1, 2]);

        let extremes = histogram(&[f64::MIN, 0.0, f64::MAX], 2).unwrap();
        assert_eq!(extremes.bins, vec![1, 2]);
    }

    #[test]
    fn test_histogram_zero_range() {
        let hist = histogram(&[3.0, 3.0, 3.0], 5).unwrap();
        assert_eq!(hist.bins, vec![3, 0, 0, 0, 0]);
    }
}
