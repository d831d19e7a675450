//! Aggregation and chart suggestions for building visualizations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset, Row};

/// How numeric values of a group are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    None,
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl std::str::FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Aggregation::None),
            "sum" => Ok(Aggregation::Sum),
            "avg" | "mean" | "average" => Ok(Aggregation::Avg),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "count" => Ok(Aggregation::Count),
            _ => Err(format!(
                "Unknown aggregation: {}. Use none, sum, avg, min, max or count.",
                s
            )),
        }
    }
}

/// Chart kinds a chart builder can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Scatter,
    Composed,
    Pie,
    RadialBar,
    Treemap,
    Radar,
}

/// Reduce the `Number` values of `column` across `rows`.
///
/// Non-numeric cells are skipped. Returns `None` for `Aggregation::None` or
/// when the column holds no numbers, except `Count`, which is always defined.
pub fn aggregate(rows: &[Row], column: &str, aggregation: Aggregation) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| match row.get(column) {
            Some(Cell::Number(n)) => Some(*n),
            _ => None,
        })
        .collect();

    if aggregation == Aggregation::Count {
        return Some(values.len() as f64);
    }
    if values.is_empty() {
        return None;
    }

    match aggregation {
        Aggregation::None | Aggregation::Count => None,
        Aggregation::Sum => Some(values.iter().sum()),
        Aggregation::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
        Aggregation::Min => Some(values.iter().copied().fold(f64::INFINITY, f64::min)),
        Aggregation::Max => Some(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
    }
}

/// Group rows by the display string of `group_by` and aggregate each of
/// `value_columns` per group.
///
/// Groups appear in first-encounter order. A group with no numbers in a value
/// column gets `Null` there. `Aggregation::None` returns the rows unchanged.
pub fn group_aggregate(
    rows: &[Row],
    group_by: &str,
    value_columns: &[String],
    aggregation: Aggregation,
) -> Vec<Row> {
    if aggregation == Aggregation::None {
        return rows.to_vec();
    }

    let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
    for row in rows {
        groups
            .entry(Cell::display_of(row.get(group_by)))
            .or_default()
            .push(row.clone());
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let mut out = Row::new();
            out.insert(group_by.to_string(), Cell::Text(key));
            for column in value_columns {
                let value = aggregate(&members, column, aggregation)
                    .map(Cell::Number)
                    .unwrap_or(Cell::Null);
                out.insert(column.clone(), value);
            }
            out
        })
        .collect()
}

/// Chart kinds that make sense for the dataset's columns.
///
/// A column counts as numeric when any row holds a number in it, and as
/// categorical when any row holds text.
pub fn suggest_charts(data: &Dataset) -> Vec<ChartKind> {
    let columns = data.columns();
    let holds = |column: &str, pred: fn(&Cell) -> bool| {
        data.rows
            .iter()
            .any(|row| row.get(column).is_some_and(pred))
    };

    let numeric = columns
        .iter()
        .filter(|c| holds(**c, |v| matches!(v, Cell::Number(_))))
        .count();
    let categorical = columns
        .iter()
        .filter(|c| holds(**c, |v| matches!(v, Cell::Text(_))))
        .count();

    let mut kinds = Vec::new();
    if numeric == 0 {
        return kinds;
    }

    kinds.extend([ChartKind::Bar, ChartKind::Line, ChartKind::Area]);
    if numeric >= 2 {
        kinds.extend([ChartKind::Scatter, ChartKind::Composed]);
    }
    if categorical > 0 {
        kinds.extend([ChartKind::Pie, ChartKind::RadialBar, ChartKind::Treemap]);
    }
    if numeric >= 3 {
        kinds.push(ChartKind::Radar);
    }
    kinds
}
