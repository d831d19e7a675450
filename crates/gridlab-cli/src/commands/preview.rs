//! Preview command - one page of the grid in the terminal.

use std::path::PathBuf;

use colored::Colorize;
use gridlab::grid::ColumnFilter;
use gridlab::{Cell, GridQuery, Gridlab, GridlabConfig, SortConfig, SortDirection};

use super::truncate;

/// Grid options gathered from the command line.
pub struct PreviewArgs {
    pub search: String,
    pub sort: Option<String>,
    pub desc: bool,
    pub filters: Vec<String>,
    pub page: usize,
    /// None uses the configured page size.
    pub rows: Option<usize>,
    pub width: usize,
}

impl PreviewArgs {
    fn to_query(&self) -> Result<GridQuery, String> {
        let mut query = GridQuery::new()
            .with_search(self.search.as_str())
            .with_page(self.page)
            .with_rows_per_page(self.rows.unwrap_or(0));

        if let Some(key) = &self.sort {
            let direction = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            query = query.with_sort(SortConfig::by(key.as_str(), direction));
        }

        for expr in &self.filters {
            query = query.with_filter(ColumnFilter::parse(expr)?);
        }

        Ok(query)
    }
}

pub fn run(
    config: GridlabConfig,
    file: PathBuf,
    args: PreviewArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let gridlab = Gridlab::with_config(config);
    let (data, _source) = gridlab.load(&file)?;
    let query = args.to_query()?;

    for filter in &query.filters {
        if !data.has_column(&filter.column) {
            eprintln!(
                "{} Filter column '{}' is not in the data",
                "Warning:".yellow().bold(),
                filter.column
            );
        }
    }

    let page = gridlab.query(&data, &query);

    if page.rows.is_empty() {
        println!("{}", "No rows match.".yellow());
        return Ok(());
    }

    let width = args.width.max(2);
    let widths: Vec<usize> = page
        .columns
        .iter()
        .map(|column| {
            page.rows
                .iter()
                .map(|row| Cell::display_of(row.get(column)).chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
                .min(width)
        })
        .collect();

    let header: Vec<String> = page
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, &w)| {
            let mut name = truncate(column, w);
            if query.sort.key.as_deref() == Some(column.as_str()) {
                name = match query.sort.direction {
                    SortDirection::Asc => format!("{}↑", truncate(column, w.saturating_sub(1))),
                    SortDirection::Desc => format!("{}↓", truncate(column, w.saturating_sub(1))),
                };
            }
            format!("{:<w$}", name, w = w)
        })
        .collect();
    println!("{}", header.join(" │ ").bold());
    println!(
        "{}",
        widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─")
            .dimmed()
    );

    for row in &page.rows {
        let cells: Vec<String> = page
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, &w)| {
                let value = row.get(column);
                let text = format!("{:<w$}", truncate(&Cell::display_of(value), w), w = w);
                if Cell::is_missing_opt(value) {
                    text.dimmed().to_string()
                } else {
                    text
                }
            })
            .collect();
        println!("{}", cells.join(" │ "));
    }

    println!();
    println!(
        "Page {} of {} ({} matching rows, {} per page)",
        page.page.to_string().white().bold(),
        page.total_pages.max(1),
        page.total_filtered,
        page.rows_per_page
    );
    if page.has_previous() {
        println!("{} --page {}", "Previous:".dimmed(), page.page - 1);
    }
    if page.has_next() {
        println!("{} --page {}", "Next:".dimmed(), page.page + 1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlab::grid::FilterOperator;

    fn args() -> PreviewArgs {
        PreviewArgs {
            search: String::new(),
            sort: None,
            desc: false,
            filters: Vec::new(),
            page: 1,
            rows: None,
            width: 24,
        }
    }

    #[test]
    fn test_query_from_args() {
        let query = PreviewArgs {
            search: "ann".to_string(),
            sort: Some("age".to_string()),
            desc: true,
            filters: vec!["plan=pro".to_string(), "age>30".to_string()],
            page: 2,
            rows: Some(10),
            ..args()
        }
        .to_query()
        .unwrap();

        assert_eq!(query.search, "ann");
        assert_eq!(query.sort, SortConfig::by("age", SortDirection::Desc));
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[1].operator, FilterOperator::GreaterThan);
        assert_eq!(query.page, 2);
        assert_eq!(query.rows_per_page, 10);
    }

    #[test]
    fn test_unset_rows_defers_to_config() {
        assert_eq!(args().to_query().unwrap().rows_per_page, 0);
    }

    #[test]
    fn test_bad_filter_is_rejected() {
        let result = PreviewArgs {
            filters: vec!["no operator here".to_string()],
            ..args()
        }
        .to_query();
        assert!(result.is_err());
    }
}
