//! Export command - write data files, zipped train/test splits or bundles.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use gridlab::{ExportFormat, Gridlab, GridlabConfig};

pub fn run(
    mut config: GridlabConfig,
    file: PathBuf,
    format: String,
    output: PathBuf,
    table_name: Option<String>,
    split_ratio: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format: ExportFormat = format.parse()?;

    if let Some(table_name) = table_name {
        config.export.table_name = table_name;
    }
    if let Some(split_ratio) = split_ratio {
        config.export.split_ratio = split_ratio;
    }

    let gridlab = Gridlab::with_config(config);
    let (data, _source) = gridlab.load(&file)?;
    let artifact = gridlab.export(&data, format)?;

    fs::create_dir_all(&output)?;
    let written = artifact.write_to(&output)?;

    println!(
        "{} {} rows as {}",
        "Exported".green().bold(),
        data.row_count(),
        format.to_string().white().bold()
    );
    for path in written {
        println!("  {}", path.display());
    }

    Ok(())
}
