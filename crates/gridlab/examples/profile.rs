//! Example: Profile a tabular data file and show its first grid page.
//!
//! Usage:
//!   cargo run --example profile -- <file_path>

use std::env;
use std::path::Path;

use gridlab::{GridQuery, Gridlab, SortConfig, SortDirection};

fn main() -> gridlab::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example profile -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let gridlab = Gridlab::new();
    let (data, source) = gridlab.load(path)?;
    let profile = gridlab.profile_dataset(&data);

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Profile: {} ({}, {} bytes)", source.file, source.format, source.size_bytes);
    println!("{}", separator);
    println!();

    for column in profile.table().columns {
        println!(
            "  {:<20} {:<8} missing {:>5.1}% ({})  unique {}",
            column.name,
            column.column_type.label(),
            column.quality.missing_percentage,
            column.quality.status,
            column.statistics.unique
        );
        if let Some(numeric) = &column.statistics.numeric {
            println!(
                "  {:<20} min {} max {} median {}",
                "", numeric.min, numeric.max, numeric.median
            );
        }
    }

    println!();
    println!(
        "Quality score {:.1} ({})",
        profile.summary.quality_score,
        if profile.validation.passed { "passed" } else { "failed" }
    );
    println!("{}", profile.summary.recommendation);

    if let Some(first) = data.columns().first() {
        let query = GridQuery::new()
            .with_sort(SortConfig::by(*first, SortDirection::Asc))
            .with_rows_per_page(5);
        let page = gridlab.query(&data, &query);
        println!();
        println!("First {} of {} rows sorted by {}:", page.rows.len(), page.total_filtered, first);
        for row in &page.rows {
            let values: Vec<String> = row.values().map(|v| v.to_string()).collect();
            println!("  {}", values.join(" | "));
        }
    }

    Ok(())
}
