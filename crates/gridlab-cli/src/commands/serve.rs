//! Serve command - JSON API over a dataset.

use std::path::PathBuf;

use colored::Colorize;
use gridlab::{Dataset, Gridlab, GridlabConfig};

use crate::server::{app, state::AppState};

pub fn run(
    config: GridlabConfig,
    file: Option<PathBuf>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let gridlab = Gridlab::with_config(config);

    let (data, source) = match &file {
        Some(path) => {
            let (data, source) = gridlab.load(path)?;
            println!(
                "{} {} ({} rows x {} columns)",
                "Loaded".green().bold(),
                source.file,
                source.row_count,
                source.column_count
            );
            (data, Some(source))
        }
        None => {
            println!(
                "{} No file given; import data with POST /api/import-data",
                "Note:".yellow().bold()
            );
            (Dataset::default(), None)
        }
    };

    let state = AppState::new(gridlab, data, source);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run_server(state, port))
}
