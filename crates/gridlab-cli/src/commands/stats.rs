//! Stats command - per-column statistics.

use std::path::PathBuf;

use colored::Colorize;
use gridlab::{Gridlab, GridlabConfig, GridlabError};

use super::{status_label, truncate};

pub fn run(
    config: GridlabConfig,
    file: PathBuf,
    column: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let gridlab = Gridlab::with_config(config);
    let (data, _source) = gridlab.load(&file)?;
    let table = gridlab.profile_dataset(&data).table();

    let columns: Vec<_> = match &column {
        Some(name) => {
            let profile = table
                .get_column(name)
                .ok_or_else(|| {
                    GridlabError::UnknownColumn(format!(
                        "{} (columns: {})",
                        name,
                        table.column_names().join(", ")
                    ))
                })?;
            vec![profile.clone()]
        }
        None => table.columns.clone(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    for profile in &columns {
        let stats = &profile.statistics;
        println!(
            "{} {} {}",
            profile.name.cyan().bold(),
            format!("({})", profile.column_type.label()).dimmed(),
            status_label(profile.quality.status)
        );
        println!(
            "  count {}  unique {}  missing {} ({:.1}%)",
            stats.count,
            stats.unique,
            profile.quality.missing_count,
            profile.quality.missing_percentage
        );

        if let Some(numeric) = &stats.numeric {
            println!(
                "  min {}  max {}  avg {:.2}  median {}  std dev {:.2}",
                numeric.min, numeric.max, numeric.avg, numeric.median, numeric.std_dev
            );
        }
        if let Some(histogram) = &stats.histogram {
            println!(
                "  {} {}  {}",
                "histogram".dimmed(),
                histogram.sparkline().cyan(),
                histogram
                    .bins
                    .iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .dimmed()
            );
        }
        if !stats.most_common.is_empty() {
            let top: Vec<String> = stats
                .most_common
                .iter()
                .map(|(value, count)| format!("{} ({})", truncate(value, 24), count))
                .collect();
            println!("  {} {}", "most common".dimmed(), top.join(", "));
        }
        println!();
    }

    Ok(())
}
