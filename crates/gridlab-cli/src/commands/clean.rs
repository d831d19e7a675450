//! Clean command - standardize formats, impute missing values, flag outliers.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use gridlab::{ExportFormat, Gridlab, GridlabConfig};

pub fn run(
    config: GridlabConfig,
    file: PathBuf,
    output: Option<PathBuf>,
    format: String,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: ExportFormat = format.parse()?;
    if matches!(
        format,
        ExportFormat::Sql | ExportFormat::TrainTestSplit | ExportFormat::Bundle
    ) {
        return Err(format!("clean writes a single data file, not {}", format).into());
    }

    let gridlab = Gridlab::with_config(config);
    let (data, _source) = gridlab.load(&file)?;
    let result = gridlab.clean(&data);

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "  {} values standardized, {} values imputed, {} outliers flagged",
        result.standardized.len().to_string().white().bold(),
        result.imputed.len().to_string().white().bold(),
        result.outlier_count().to_string().white().bold()
    );

    for (column, count) in result.changes_by_column() {
        println!("  {:<20} {} changed", column, count);
    }
    for (column, rows) in &result.outliers {
        if rows.is_empty() {
            continue;
        }
        let shown: Vec<String> = rows.iter().take(10).map(|r| (r + 1).to_string()).collect();
        println!(
            "  {} {} outlier rows: {}{}",
            "Outliers:".yellow().bold(),
            column,
            shown.join(", "),
            if rows.len() > 10 { ", …" } else { "" }
        );
    }

    if dry_run {
        println!();
        println!("{}", "Dry run: nothing written.".dimmed());
        return Ok(());
    }

    let output = output.unwrap_or_else(|| default_output(&file, format));
    let artifact = gridlab.export(&result.data, format)?;
    let contents = artifact
        .files
        .first()
        .map(|f| f.contents.as_slice())
        .unwrap_or_default();
    fs::write(&output, contents)?;

    println!();
    println!(
        "{} Cleaned data written to {}",
        "Saved:".green().bold(),
        output.display()
    );

    Ok(())
}

/// `<dir>/<stem>_cleaned.<ext>` next to the input.
fn default_output(file: &Path, format: ExportFormat) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let extension = match format {
        ExportFormat::Json => "json",
        ExportFormat::Jsonl => "jsonl",
        ExportFormat::Excel => "xlsx",
        #[cfg(feature = "parquet")]
        ExportFormat::Parquet => "parquet",
        _ => "csv",
    };
    file.with_file_name(format!("{}_cleaned.{}", stem, extension))
}
