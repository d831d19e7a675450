//! Gridlab CLI - profile, validate, clean and export tabular data.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use env_logger::Env;
use gridlab::GridlabConfig;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(Env::default().default_filter_or(default_level));

    let config = match &cli.config {
        Some(path) => match GridlabConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => GridlabConfig::default(),
    };

    let result = match cli.command {
        Commands::Profile { file, output, json } => {
            commands::profile::run(config, file, output, json)
        }

        Commands::Preview {
            file,
            search,
            sort,
            desc,
            filters,
            page,
            rows,
            width,
        } => commands::preview::run(
            config,
            file,
            commands::preview::PreviewArgs {
                search,
                sort,
                desc,
                filters,
                page,
                rows,
                width,
            },
        ),

        Commands::Stats { file, column, json } => commands::stats::run(config, file, column, json),

        Commands::Validate {
            file,
            issues,
            strict,
            json,
        } => commands::validate::run(config, file, issues, strict, json),

        Commands::Clean {
            file,
            output,
            format,
            dry_run,
        } => commands::clean::run(config, file, output, format, dry_run),

        Commands::Export {
            file,
            format,
            output,
            table_name,
            split_ratio,
        } => commands::export::run(config, file, format, output, table_name, split_ratio),

        Commands::Serve { file, port } => commands::serve::run(config, file, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
