//! Profile command - types, completeness, statistics and validation summary.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use gridlab::{Gridlab, GridlabConfig};

use super::{score_label, status_label, truncate};

pub fn run(
    config: GridlabConfig,
    file: PathBuf,
    output: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let gridlab = Gridlab::with_config(config);
    let profile = gridlab.profile(&file)?;

    if let Some(output) = &output {
        fs::write(output, serde_json::to_string_pretty(&profile)?)?;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let summary = &profile.summary;
    println!(
        "{} {}",
        "Profile of".cyan().bold(),
        file.display().to_string().white()
    );
    if let Some(source) = &profile.source {
        println!(
            "  {} {}  {} bytes  {}",
            "Format:".dimmed(),
            source.format,
            source.size_bytes,
            source.hash.dimmed()
        );
    }
    println!(
        "  {} rows x {} columns, {} missing values",
        summary.total_rows.to_string().white().bold(),
        summary.total_columns.to_string().white().bold(),
        summary.total_missing
    );
    println!();

    let header = format!(
        "  {:<20} {:<8} {:>9} {:<6} {:>7}  {}",
        "Column", "Type", "Missing", "Status", "Unique", "Distribution"
    );
    println!("{}", header.bold());
    for column in profile.table().columns {
        let distribution = match (&column.statistics.numeric, &column.statistics.histogram) {
            (Some(numeric), Some(histogram)) => format!(
                "{} {}..{}",
                histogram.sparkline().cyan(),
                numeric.min,
                numeric.max
            ),
            _ => column
                .statistics
                .most_common
                .iter()
                .map(|(value, count)| format!("{} ({})", truncate(value, 12), count))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!(
            "  {:<20} {:<8} {:>8.1}% {}   {:>7}  {}",
            truncate(&column.name, 20),
            column.column_type.label(),
            column.quality.missing_percentage,
            status_label(column.quality.status),
            column.statistics.unique,
            distribution
        );
    }
    println!();

    let validation = &profile.validation;
    println!(
        "Quality score: {}  (completeness {:.1}%, accuracy {:.1}%)",
        score_label(summary.quality_score),
        validation.completeness,
        validation.accuracy
    );
    println!(
        "Columns: {} good, {} fair, {} poor",
        summary.good_columns.to_string().green(),
        summary.fair_columns.to_string().yellow(),
        summary.poor_columns.to_string().red()
    );
    println!("{} {}", "Recommendation:".cyan().bold(), summary.recommendation);

    if let Some(output) = output {
        println!();
        println!(
            "{} Profile written to {}",
            "Saved:".green().bold(),
            output.display()
        );
    }

    Ok(())
}
