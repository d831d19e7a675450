//! Gridlab: profiling, validation and cleaning for in-memory tabular datasets.
//!
//! A dataset is loaded from CSV or JSON and run through a fixed pipeline:
//! column types are inferred, completeness is rated, statistics are computed
//! and the rows are served through a searchable, sortable, paginated grid.
//! Independently, a validation pass infers a rule per column and flags the
//! cells that break it.
//!
//! # Core Principles
//!
//! - **Browser semantics**: values compare, coerce and display the way the
//!   dashboard that consumes them would
//! - **Non-destructive**: cleaning works on a copy and records every change
//! - **Whole dataset in memory**: every stage is a pure function over a
//!   [`Dataset`]
//!
//! # Example
//!
//! ```no_run
//! use gridlab::{Gridlab, GridQuery};
//!
//! let gridlab = Gridlab::new();
//! let (data, _source) = gridlab.load("people.csv").unwrap();
//!
//! let profile = gridlab.profile_dataset(&data);
//! println!("Quality score: {:.1}", profile.summary.quality_score);
//!
//! let page = gridlab.query(&data, &GridQuery::new().with_search("smith"));
//! println!("{} matching rows", page.total_filtered);
//! ```

pub mod cleaning;
pub mod error;
pub mod export;
pub mod grid;
pub mod inference;
pub mod input;
pub mod schema;
pub mod validation;

mod gridlab;

pub use crate::gridlab::{GridConfig, Gridlab, GridlabConfig, Profile, ProfileSummary};
pub use cleaning::{Cleaner, CleaningConfig, CleaningResult};
pub use error::{GridlabError, Result};
pub use export::{ContentEncoding, ExportArtifact, ExportFile, ExportFormat, ExportOptions, Exporter};
pub use grid::{GridPage, GridQuery, SortConfig, SortDirection};
pub use input::{Cell, Dataset, InputFormat, Row, SourceMetadata};
pub use schema::{ColumnType, QualityStatus, RuleKind, TableProfile};
pub use validation::{ValidationReport, ValidationRule, Validator};
