//! Heuristic detection of a validation rule per column.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::input::{Cell, Dataset};
use crate::schema::RuleKind;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,4}[-./]\d{1,2}[-./]\d{1,4}$").expect("valid date regex"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s()+\-.]{7,20}$").expect("valid phone regex"));

/// Knobs for rule detection and the pass/fail verdict of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Non-missing values inspected per column.
    pub sample_size: usize,
    /// Share of the sample that must match a pattern for it to apply.
    pub match_ratio: f64,
    /// Most distinct sample values an enum column may have.
    pub enum_max_unique: usize,
    /// Distinct/sample ratio an enum column must stay below.
    pub enum_max_ratio: f64,
    /// Completeness (percent) required to pass.
    pub completeness_pass: f64,
    /// Accuracy (percent) required to pass.
    pub accuracy_pass: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            match_ratio: 0.8,
            enum_max_unique: 10,
            enum_max_ratio: 0.5,
            completeness_pass: 95.0,
            accuracy_pass: 90.0,
        }
    }
}

/// The inferred shape of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub is_numeric: bool,
    pub is_date: bool,
    pub is_email: bool,
    pub is_phone: bool,
    /// Sample minimum, numeric rules only.
    pub min: Option<f64>,
    /// Sample maximum, numeric rules only.
    pub max: Option<f64>,
    /// Distinct sample values in encounter order, enum rules only.
    pub allowed_values: Vec<String>,
}

impl ValidationRule {
    /// A rule of the given kind with the flags derived from it.
    pub fn of_kind(kind: RuleKind) -> Self {
        Self {
            kind,
            is_numeric: kind == RuleKind::Numeric,
            is_date: kind == RuleKind::Date,
            is_email: kind == RuleKind::Email,
            is_phone: kind == RuleKind::Phone,
            min: None,
            max: None,
            allowed_values: Vec::new(),
        }
    }

    /// Whether a non-missing value conforms to this rule.
    ///
    /// `min`/`max` describe the sample and are not enforced.
    pub fn check(&self, value: &Cell) -> bool {
        match self.kind {
            RuleKind::Enum => {
                let display = value.to_string();
                self.allowed_values.iter().any(|v| *v == display)
            }
            RuleKind::String => true,
            kind => matches_kind(kind, value),
        }
    }
}

/// Whether a value passes the pattern test of a pattern-based kind.
pub fn matches_kind(kind: RuleKind, value: &Cell) -> bool {
    match kind {
        RuleKind::Numeric => value.to_number().is_finite(),
        RuleKind::Date => DATE_PATTERN.is_match(value.to_string().trim()),
        RuleKind::Email => EMAIL_PATTERN.is_match(value.to_string().trim()),
        RuleKind::Phone => PHONE_PATTERN.is_match(value.to_string().trim()),
        RuleKind::Enum | RuleKind::String => true,
    }
}

/// Infers a [`ValidationRule`] for every column from a sample of its values.
#[derive(Debug, Clone, Default)]
pub struct RuleDetector {
    config: ValidationConfig,
}

impl RuleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Detect a rule for each column of the first row.
    pub fn detect(&self, data: &Dataset) -> IndexMap<String, ValidationRule> {
        data.columns()
            .into_iter()
            .map(|name| (name.to_string(), self.detect_column(data, name)))
            .collect()
    }

    /// Detect the rule of one column.
    ///
    /// Pattern kinds are tried in [`RuleKind::PATTERN_PRIORITY`] order and the
    /// first one reaching the match ratio wins; otherwise the column is an
    /// enum when its sample has few distinct values, else plain string.
    pub fn detect_column(&self, data: &Dataset, name: &str) -> ValidationRule {
        let sample: Vec<&Cell> = data.present_values(name).take(self.config.sample_size).collect();
        if sample.is_empty() {
            return ValidationRule::of_kind(RuleKind::String);
        }

        let required = self.config.match_ratio * sample.len() as f64;
        let kind = RuleKind::PATTERN_PRIORITY
            .into_iter()
            .find(|&kind| {
                let hits = sample.iter().filter(|v| matches_kind(kind, v)).count();
                hits as f64 >= required
            });

        let rule = match kind {
            Some(RuleKind::Numeric) => {
                let numbers: Vec<f64> = sample
                    .iter()
                    .map(|v| v.to_number())
                    .filter(|n| n.is_finite())
                    .collect();
                let mut rule = ValidationRule::of_kind(RuleKind::Numeric);
                rule.min = numbers.iter().copied().reduce(f64::min);
                rule.max = numbers.iter().copied().reduce(f64::max);
                rule
            }
            Some(kind) => ValidationRule::of_kind(kind),
            None => self.enum_or_string(&sample),
        };

        debug!("column '{}' validated as {}", name, rule.kind);
        rule
    }

    fn enum_or_string(&self, sample: &[&Cell]) -> ValidationRule {
        let mut seen = HashSet::new();
        let distinct: Vec<String> = sample
            .iter()
            .map(|v| v.to_string())
            .filter(|v| seen.insert(v.clone()))
            .collect();

        let ratio = distinct.len() as f64 / sample.len() as f64;
        if distinct.len() <= self.config.enum_max_unique && ratio < self.config.enum_max_ratio {
            let mut rule = ValidationRule::of_kind(RuleKind::Enum);
            rule.allowed_values = distinct;
            rule
        } else {
            ValidationRule::of_kind(RuleKind::String)
        }
    }
}
