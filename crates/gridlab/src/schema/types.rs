//! Core type definitions for column classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display type of a column, decided from its first value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Number,
    Boolean,
    Date,
    String,
}

impl ColumnType {
    /// Returns true if numeric statistics apply to this type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Number => "Number",
            ColumnType::Boolean => "Boolean",
            ColumnType::Date => "Date",
            ColumnType::String => "String",
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tri-state completeness rating of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    Good,
    Fair,
    Poor,
}

impl QualityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            QualityStatus::Good => "good",
            QualityStatus::Fair => "fair",
            QualityStatus::Poor => "poor",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape a column's values are expected to follow.
///
/// Variants are listed in detection priority order: the first kind whose
/// test passes is the one assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Email,
    Date,
    Numeric,
    Phone,
    Enum,
    String,
}

impl RuleKind {
    /// Kinds that are decided by a match-ratio test, in priority order.
    pub const PATTERN_PRIORITY: [RuleKind; 4] =
        [RuleKind::Email, RuleKind::Date, RuleKind::Numeric, RuleKind::Phone];

    /// Human-readable description used in issue messages.
    pub fn description(&self) -> &'static str {
        match self {
            RuleKind::Email => "email address",
            RuleKind::Date => "date",
            RuleKind::Numeric => "number",
            RuleKind::Phone => "phone number",
            RuleKind::Enum => "one of the allowed values",
            RuleKind::String => "text",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Email => "email",
            RuleKind::Date => "date",
            RuleKind::Numeric => "numeric",
            RuleKind::Phone => "phone",
            RuleKind::Enum => "enum",
            RuleKind::String => "string",
        };
        f.write_str(name)
    }
}
