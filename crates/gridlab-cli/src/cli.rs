//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gridlab: profile, validate, clean and export tabular data
#[derive(Parser)]
#[command(name = "gridlab")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file; unset fields keep their defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file: types, completeness, statistics and validation
    Profile {
        /// Path to the data file (CSV/TSV/JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the full profile as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the profile as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show one page of the grid with search, filters and sorting
    Preview {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Case-insensitive search across all values
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Column filter, e.g. "age>30", "plan=pro", "name~ann" (repeatable)
        #[arg(short, long = "filter", value_name = "EXPR")]
        filters: Vec<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (default from config)
        #[arg(short, long)]
        rows: Option<usize>,

        /// Maximum characters shown per cell
        #[arg(long, default_value = "24")]
        width: usize,
    },

    /// Show per-column statistics
    Stats {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only this column
        #[arg(short, long)]
        column: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect a rule per column and report cells that break it
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of issues to list
        #[arg(short = 'n', long, default_value = "20")]
        issues: usize,

        /// Exit with an error when the dataset does not pass
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Standardize formats and impute missing values
    Clean {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the cleaned data (default: <file>_cleaned.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv, json, jsonl, excel (or parquet with the parquet feature)
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Export data as json, jsonl, csv, sql, excel, parquet, train_test_split or bundle
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Export format
        #[arg(short, long)]
        format: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Table name for SQL output
        #[arg(long)]
        table_name: Option<String>,

        /// Training share for train_test_split and bundle (0.5 to 0.9)
        #[arg(long)]
        split_ratio: Option<f64>,
    },

    /// Serve the grid over a JSON API
    Serve {
        /// Data file to load at startup
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Port for the web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}
