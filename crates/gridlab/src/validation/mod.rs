//! Validation: infer a rule per column, then flag non-conforming cells.

mod report;
mod rules;

pub use report::{CellIssue, ValidationReport, Validator};
pub use rules::{RuleDetector, ValidationConfig, ValidationRule, matches_kind};
