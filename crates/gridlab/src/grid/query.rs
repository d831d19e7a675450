//! User-driven grid state: search term, sort key, column filters, page.

use serde::{Deserialize, Serialize};

use crate::input::{Cell, Row};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Single-key sort state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    /// Sort by `key` in the given direction.
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Header-click behaviour: clicking the ascending key flips it to
    /// descending, clicking anything else sorts that key ascending.
    pub fn toggle(&mut self, key: &str) {
        let direction = if self.key.as_deref() == Some(key) && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.key = Some(key.to_string());
        self.direction = direction;
    }
}

/// Comparison applied by a column filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
}

impl std::str::FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "equals" | "eq" | "=" | "==" => Ok(FilterOperator::Equals),
            "not_equals" | "notequals" | "ne" | "!=" => Ok(FilterOperator::NotEquals),
            "greater_than" | "greaterthan" | "gt" | ">" => Ok(FilterOperator::GreaterThan),
            "less_than" | "lessthan" | "lt" | "<" => Ok(FilterOperator::LessThan),
            "contains" | "like" => Ok(FilterOperator::Contains),
            _ => Err(format!(
                "Unknown filter operator: {}. Use equals, not_equals, greater_than, less_than or contains.",
                s
            )),
        }
    }
}

/// A predicate on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Cell,
}

impl ColumnFilter {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<Cell>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Parse `column<op>value` where op is `=`, `!=`, `>`, `<` or `~`
    /// (contains).
    pub fn parse(expr: &str) -> Result<Self, String> {
        const OPERATORS: [(&str, FilterOperator); 5] = [
            ("!=", FilterOperator::NotEquals),
            ("~", FilterOperator::Contains),
            (">", FilterOperator::GreaterThan),
            ("<", FilterOperator::LessThan),
            ("=", FilterOperator::Equals),
        ];

        for (token, operator) in OPERATORS {
            if let Some((column, value)) = expr.split_once(token) {
                let column = column.trim();
                if column.is_empty() {
                    return Err(format!("Filter '{}' has no column name", expr));
                }
                return Ok(Self::new(column, operator, Cell::from_field(value)));
            }
        }

        Err(format!(
            "Invalid filter '{}'. Expected column=value, column!=value, column>value, column<value or column~text.",
            expr
        ))
    }

    /// Whether the row passes this filter.
    pub fn matches(&self, row: &Row) -> bool {
        let value = row.get(&self.column);
        match self.operator {
            FilterOperator::Equals => value.is_some_and(|v| v.loose_eq(&self.value)),
            FilterOperator::NotEquals => !value.is_some_and(|v| v.loose_eq(&self.value)),
            FilterOperator::GreaterThan => {
                Cell::loose_cmp(value, Some(&self.value)) == std::cmp::Ordering::Greater
            }
            FilterOperator::LessThan => {
                Cell::loose_cmp(value, Some(&self.value)) == std::cmp::Ordering::Less
            }
            FilterOperator::Contains => Cell::display_of(value)
                .to_lowercase()
                .contains(&self.value.to_string().to_lowercase()),
        }
    }
}

/// Everything needed to produce one page of the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridQuery {
    /// Free-text search; matched case-insensitively against every value.
    pub search: String,
    pub sort: SortConfig,
    pub filters: Vec<ColumnFilter>,
    /// Restrict the search to these columns (None = all values of the row).
    pub visible_columns: Option<Vec<String>>,
    /// 1-based page number.
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for GridQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortConfig::default(),
            filters: Vec::new(),
            visible_columns: None,
            page: 1,
            rows_per_page: 50,
        }
    }
}

impl GridQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_visible_columns(mut self, columns: Vec<String>) -> Self {
        self.visible_columns = Some(columns);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Cell)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_toggle_sort() {
        let mut sort = SortConfig::default();
        sort.toggle("name");
        assert_eq!(sort, SortConfig::by("name", SortDirection::Asc));
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Asc);
        sort.toggle("age");
        assert_eq!(sort, SortConfig::by("age", SortDirection::Asc));
    }

    #[test]
    fn test_parse_filter() {
        let filter = ColumnFilter::parse("age>30").unwrap();
        assert_eq!(filter.column, "age");
        assert_eq!(filter.operator, FilterOperator::GreaterThan);
        assert_eq!(filter.value, Cell::Number(30.0));

        let filter = ColumnFilter::parse("status != active").unwrap();
        assert_eq!(filter.operator, FilterOperator::NotEquals);
        assert_eq!(filter.value, Cell::text("active"));

        assert!(ColumnFilter::parse("=x").is_err());
        assert!(ColumnFilter::parse("nothing").is_err());
    }

    #[test]
    fn test_filter_matches() {
        let r = row(&[("age", Cell::Number(42.0)), ("name", Cell::text("Alice"))]);

        assert!(ColumnFilter::new("age", FilterOperator::Equals, "42").matches(&r));
        assert!(ColumnFilter::new("age", FilterOperator::GreaterThan, 40.0).matches(&r));
        assert!(!ColumnFilter::new("age", FilterOperator::LessThan, 40.0).matches(&r));
        assert!(ColumnFilter::new("name", FilterOperator::Contains, "lic").matches(&r));
        assert!(ColumnFilter::new("name", FilterOperator::NotEquals, "Bob").matches(&r));
        assert!(ColumnFilter::new("missing", FilterOperator::NotEquals, "x").matches(&r));
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("gt".parse::<FilterOperator>(), Ok(FilterOperator::GreaterThan));
        assert_eq!("not-equals".parse::<FilterOperator>(), Ok(FilterOperator::NotEquals));
        assert!("between".parse::<FilterOperator>().is_err());
    }
}
