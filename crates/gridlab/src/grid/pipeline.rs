//! Filter, sort and paginate over an in-memory dataset.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset, Row, SortKey};

use super::query::{GridQuery, SortDirection};

/// One page of filtered and sorted rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridPage {
    /// Column order of the dataset's first row.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Rows surviving filters and search, across all pages.
    pub total_filtered: usize,
    pub total_pages: usize,
    /// The page actually served, after clamping.
    pub page: usize,
    pub rows_per_page: usize,
}

impl GridPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Whether any value of the row contains the term, case-insensitively.
///
/// With `columns`, only those columns are searched; otherwise every value
/// the row holds is.
pub fn row_matches_search(row: &Row, term: &str, columns: Option<&[String]>) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let contains = |cell: &Cell| cell.to_string().to_lowercase().contains(&needle);

    match columns {
        Some(columns) => columns
            .iter()
            .filter_map(|c| row.get(c))
            .any(contains),
        None => row.values().any(contains),
    }
}

/// Apply filters and search, then sort; returns the full filtered order.
pub fn filter_and_sort<'a>(data: &'a Dataset, query: &GridQuery) -> Vec<&'a Row> {
    let rows: Vec<&Row> = data
        .rows
        .iter()
        .filter(|row| query.filters.iter().all(|f| f.matches(row)))
        .filter(|row| {
            row_matches_search(row, &query.search, query.visible_columns.as_deref())
        })
        .collect();

    let Some(key) = query.sort.key.as_deref() else {
        return rows;
    };

    let mut keyed: Vec<(SortKey<'a>, &'a Row)> = rows
        .into_iter()
        .map(|row| (Cell::sort_key(row.get(key)), row))
        .collect();

    // Vec::sort_by is stable: equal keys keep their filtered order.
    keyed.sort_by(|(a, _), (b, _)| match query.sort.direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => a.cmp(b).reverse(),
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Run the whole pipeline and cut out the requested page.
pub fn run_query(data: &Dataset, query: &GridQuery) -> GridPage {
    let rows_per_page = query.rows_per_page.max(1);
    let filtered = filter_and_sort(data, query);

    let total_filtered = filtered.len();
    let total_pages = total_filtered.div_ceil(rows_per_page);
    let page = query.page.clamp(1, total_pages.max(1));

    let start = (page - 1) * rows_per_page;
    let rows: Vec<Row> = filtered
        .into_iter()
        .skip(start)
        .take(rows_per_page)
        .cloned()
        .collect();

    debug!(
        "grid query: {} of {} rows match, page {}/{}",
        total_filtered,
        data.row_count(),
        page,
        total_pages
    );

    GridPage {
        columns: data.columns().into_iter().map(String::from).collect(),
        rows,
        total_filtered,
        total_pages,
        page,
        rows_per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ColumnFilter, FilterOperator, SortConfig};

    fn names(values: &[&str]) -> Dataset {
        Dataset::from_columns(&["n"], values.iter().map(|&v| vec![Cell::text(v)]).collect())
    }

    fn column(page: &GridPage, name: &str) -> Vec<String> {
        page.rows.iter().map(|r| Cell::display_of(r.get(name))).collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let data = names(&["b", "a", "c"]);

        let asc = run_query(&data, &GridQuery::new().with_sort(SortConfig::by("n", SortDirection::Asc)));
        assert_eq!(column(&asc, "n"), vec!["a", "b", "c"]);

        let desc = run_query(&data, &GridQuery::new().with_sort(SortConfig::by("n", SortDirection::Desc)));
        assert_eq!(column(&desc, "n"), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let data = names(&["b", "a", "c"]);
        let page = run_query(&data, &GridQuery::new().with_search("B"));
        assert_eq!(page.total_filtered, 1);
        assert_eq!(column(&page, "n"), vec!["b"]);
    }

    #[test]
    fn test_search_matches_any_column() {
        let data = Dataset::from_columns(
            &["id", "city"],
            vec![
                vec![Cell::Number(15.0), Cell::text("Paris")],
                vec![Cell::Number(2.0), Cell::text("Oslo")],
                vec![Cell::Null, Cell::text("Lima")],
            ],
        );
        assert_eq!(run_query(&data, &GridQuery::new().with_search("5")).total_filtered, 1);
        assert_eq!(run_query(&data, &GridQuery::new().with_search("null")).total_filtered, 1);

        let scoped = GridQuery::new()
            .with_search("5")
            .with_visible_columns(vec!["city".to_string()]);
        assert_eq!(run_query(&data, &scoped).total_filtered, 0);
    }

    #[test]
    fn test_numeric_sort_uses_numbers() {
        let data = Dataset::from_columns(
            &["v"],
            vec![
                vec![Cell::Number(10.0)],
                vec![Cell::Number(9.0)],
                vec![Cell::Number(100.0)],
            ],
        );
        let page = run_query(&data, &GridQuery::new().with_sort(SortConfig::by("v", SortDirection::Asc)));
        assert_eq!(column(&page, "v"), vec!["9", "10", "100"]);
    }

    #[test]
    fn test_pagination_and_clamping() {
        let rows: Vec<Vec<Cell>> = (0..120).map(|i| vec![Cell::Number(i as f64)]).collect();
        let data = Dataset::from_columns(&["i"], rows);

        let first = run_query(&data, &GridQuery::new());
        assert_eq!(first.rows.len(), 50);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = run_query(&data, &GridQuery::new().with_page(99));
        assert_eq!(last.page, 3);
        assert_eq!(last.rows.len(), 20);
        assert!(!last.has_next());

        let zero = run_query(&data, &GridQuery::new().with_page(0));
        assert_eq!(zero.page, 1);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let data = names(&["a"]);
        let page = run_query(&data, &GridQuery::new().with_search("zzz"));
        assert_eq!(page.total_filtered, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_filters_apply_before_search() {
        let data = Dataset::from_columns(
            &["name", "age"],
            vec![
                vec![Cell::text("Ann"), Cell::Number(31.0)],
                vec![Cell::text("Andy"), Cell::Number(25.0)],
                vec![Cell::text("Bob"), Cell::Number(40.0)],
            ],
        );
        let query = GridQuery::new()
            .with_filter(ColumnFilter::new("age", FilterOperator::GreaterThan, 30.0))
            .with_search("an");
        let page = run_query(&data, &query);
        assert_eq!(column(&page, "name"), vec!["Ann"]);
    }

    #[test]
    fn test_sort_is_stable_for_unordered_values() {
        let data = Dataset::from_columns(
            &["k", "v"],
            vec![
                vec![Cell::text("x"), Cell::Number(1.0)],
                vec![Cell::Number(2.0), Cell::Number(2.0)],
                vec![Cell::text("y"), Cell::Number(3.0)],
            ],
        );
        // Absent keys compare equal, so the filtered order is kept.
        let page = run_query(&data, &GridQuery::new().with_sort(SortConfig::by("missing", SortDirection::Asc)));
        assert_eq!(column(&page, "v"), vec!["1", "2", "3"]);
    }

    fn sorted(data: &Dataset, key: &str, direction: SortDirection) -> GridPage {
        let query = GridQuery::new()
            .with_sort(SortConfig::by(key, direction))
            .with_rows_per_page(usize::MAX);
        run_query(data, &query)
    }

    #[test]
    fn test_mixed_column_sorts_without_panicking() {
        let mut rng = fastrand::Rng::with_seed(7);
        let rows: Vec<Vec<Cell>> = (0..2000)
            .map(|i| {
                let k = match rng.u8(0..5) {
                    0 => Cell::Number(rng.f64() * 100.0 - 50.0),
                    1 => Cell::text(rng.u32(0..1000).to_string()),
                    2 => Cell::text(["pear", "apple", "fig", "kiwi"][rng.usize(0..4)]),
                    3 => Cell::Number(f64::NAN),
                    _ => Cell::Null,
                };
                vec![k, Cell::Number(i as f64)]
            })
            .collect();
        let data = Dataset::from_columns(&["k", "i"], rows);

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let page = sorted(&data, "k", direction);
            assert_eq!(page.rows.len(), 2000);

            let keys: Vec<SortKey<'_>> = page.rows.iter().map(|r| Cell::sort_key(r.get("k"))).collect();
            for pair in keys.windows(2) {
                match direction {
                    SortDirection::Asc => assert!(pair[0] <= pair[1]),
                    SortDirection::Desc => assert!(pair[0] >= pair[1]),
                }
            }

            let mut seen: Vec<usize> = page.rows.iter().map(|r| r["i"].to_number() as usize).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..2000).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_mixed_column_groups_numbers_text_then_missing() {
        let data = Dataset::from_columns(
            &["k"],
            vec![
                vec![Cell::text("b")],
                vec![Cell::Number(f64::NAN)],
                vec![Cell::Number(3.0)],
                vec![Cell::text("a")],
                vec![Cell::Number(-1.0)],
            ],
        );
        let page = sorted(&data, "k", SortDirection::Asc);
        assert_eq!(column(&page, "k"), vec!["-1", "3", "a", "b", "NaN"]);
    }

    #[test]
    fn test_homogeneous_text_sorts_as_strings() {
        let data = names(&["10", "9", "100", "apple"]);
        let page = sorted(&data, "n", SortDirection::Asc);
        assert_eq!(column(&page, "n"), vec!["10", "100", "9", "apple"]);
    }

    #[test]
    fn test_descending_keeps_ties_in_order() {
        let data = Dataset::from_columns(
            &["k", "v"],
            vec![
                vec![Cell::Number(1.0), Cell::text("first")],
                vec![Cell::Number(2.0), Cell::text("high")],
                vec![Cell::Number(1.0), Cell::text("second")],
            ],
        );
        let page = sorted(&data, "k", SortDirection::Desc);
        assert_eq!(column(&page, "v"), vec!["high", "first", "second"]);
    }
}
