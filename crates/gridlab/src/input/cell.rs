//! Scalar cell values and the loose comparison rules the grid uses.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single scalar value in a row.
///
/// A key that is absent from a row is represented by `Option::None` at the
/// lookup site, never by a `Cell`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Whether this value counts as missing (`null` or empty string).
    ///
    /// `0`, `false` and whitespace-only strings are present values.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether an optional lookup result counts as missing.
    pub fn is_missing_opt(cell: Option<&Cell>) -> bool {
        cell.map_or(true, Cell::is_missing)
    }

    /// Numeric coercion: `null` is 0, booleans are 0/1, text is parsed after
    /// trimming (empty text is 0, unparseable text is NaN).
    pub fn to_number(&self) -> f64 {
        match self {
            Cell::Null => 0.0,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Cell::Number(n) => *n,
            Cell::Text(s) => parse_number(s).unwrap_or(f64::NAN),
        }
    }

    /// Numeric coercion of an optional lookup; undefined is NaN.
    pub fn number_of(cell: Option<&Cell>) -> f64 {
        cell.map_or(f64::NAN, Cell::to_number)
    }

    /// Display string of an optional lookup; undefined is `"undefined"`.
    pub fn display_of(cell: Option<&Cell>) -> String {
        cell.map_or_else(|| "undefined".to_string(), |c| c.to_string())
    }

    /// Loose relational comparison.
    ///
    /// Two text values compare as strings. Any other pairing coerces both
    /// sides to numbers; if either is NaN the values are unordered and this
    /// returns `Ordering::Equal`.
    pub fn loose_cmp(a: Option<&Cell>, b: Option<&Cell>) -> Ordering {
        if let (Some(Cell::Text(x)), Some(Cell::Text(y))) = (a, b) {
            return x.cmp(y);
        }
        let x = Cell::number_of(a);
        let y = Cell::number_of(b);
        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    }

    /// Sort key of an optional lookup; see [`SortKey`].
    pub fn sort_key(cell: Option<&Cell>) -> SortKey<'_> {
        match cell {
            None => SortKey::Unordered,
            Some(Cell::Text(s)) if s.trim().is_empty() => SortKey::Number(0.0),
            Some(Cell::Text(s)) => SortKey::Text(s),
            Some(other) => {
                let n = other.to_number();
                if n.is_nan() {
                    SortKey::Unordered
                } else if n == 0.0 {
                    SortKey::Number(0.0)
                } else {
                    SortKey::Number(n)
                }
            }
        }
    }

    /// Loose equality against a user-entered operand.
    ///
    /// Text compares as text; `null` equals only `null`; numbers and booleans
    /// compare numerically after coercing the operand.
    pub fn loose_eq(&self, operand: &Cell) -> bool {
        match (self, operand) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Null, _) | (_, Cell::Null) => false,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            _ => self.to_number() == operand.to_number(),
        }
    }

    /// Infer a cell from raw delimited-text input.
    ///
    /// Finite numbers become `Number`, everything else stays text.
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        match parse_number(trimmed) {
            Some(n) if !trimmed.is_empty() && n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }
}

/// Total-order key for sorting one column.
///
/// Numbers (and `null`, booleans and blank text, coerced) sort numerically,
/// other text sorts as strings, and undefined or NaN values sort last. A column holding one kind
/// of value orders exactly as [`Cell::loose_cmp`] would; mixed columns group
/// numbers before text.
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
    Unordered,
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Unordered => 2,
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

/// Parse a number the way a browser's `Number()` would, minus hex/octal forms.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust accepts "inf"/"nan" spellings that a browser would not.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Format a number like a browser's `String(n)` for the common cases.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "null"),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Value::String(s) => Cell::Text(s),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<Cell> for Value {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(b),
            Cell::Number(n) => number_to_json(n),
            Cell::Text(s) => Value::String(s),
        }
    }
}

/// Integral numbers become JSON integers; NaN/Infinity become `null`.
fn number_to_json(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        assert!(Cell::Null.is_missing());
        assert!(Cell::text("").is_missing());
        assert!(Cell::is_missing_opt(None));
        assert!(!Cell::Number(0.0).is_missing());
        assert!(!Cell::Bool(false).is_missing());
        assert!(!Cell::text("  ").is_missing());
    }

    #[test]
    fn test_display_matches_browser_strings() {
        assert_eq!(Cell::Number(1.0).to_string(), "1");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Cell::Null.to_string(), "null");
        assert_eq!(Cell::Bool(true).to_string(), "true");
        assert_eq!(Cell::display_of(None), "undefined");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Cell::Null.to_number(), 0.0);
        assert_eq!(Cell::Bool(true).to_number(), 1.0);
        assert_eq!(Cell::text(" 42 ").to_number(), 42.0);
        assert_eq!(Cell::text("").to_number(), 0.0);
        assert!(Cell::text("abc").to_number().is_nan());
        assert!(Cell::text("inf").to_number().is_nan());
        assert!(Cell::number_of(None).is_nan());
    }

    #[test]
    fn test_sort_key_orders_kinds() {
        let five = Cell::Number(5.0);
        let word = Cell::text("apple");
        let numeric_text = Cell::text("3");
        let nan = Cell::Number(f64::NAN);

        assert!(Cell::sort_key(Some(&five)) < Cell::sort_key(Some(&word)));
        assert!(Cell::sort_key(Some(&word)) < Cell::sort_key(None));
        assert!(Cell::sort_key(Some(&numeric_text)) > Cell::sort_key(Some(&five)));
        assert_eq!(Cell::sort_key(Some(&nan)), Cell::sort_key(None));
        assert_eq!(
            Cell::sort_key(Some(&Cell::Null)),
            Cell::sort_key(Some(&Cell::Number(-0.0)))
        );
        assert!(Cell::sort_key(Some(&Cell::Bool(true))) > Cell::sort_key(Some(&Cell::Null)));
        assert_eq!(Cell::sort_key(Some(&Cell::text(""))), Cell::sort_key(Some(&Cell::Null)));
        assert!(Cell::sort_key(Some(&Cell::text(""))) < Cell::sort_key(Some(&word)));
    }

    #[test]
    fn test_sort_key_is_transitive_on_mixed_values() {
        let values = [
            Some(Cell::text("x")),
            Some(Cell::Number(2.0)),
            Some(Cell::text("y")),
            Some(Cell::text("10")),
            Some(Cell::Null),
            Some(Cell::Number(f64::NAN)),
            None,
        ];
        for a in &values {
            for b in &values {
                for c in &values {
                    let (ka, kb, kc) = (
                        Cell::sort_key(a.as_ref()),
                        Cell::sort_key(b.as_ref()),
                        Cell::sort_key(c.as_ref()),
                    );
                    if ka <= kb && kb <= kc {
                        assert!(ka <= kc, "{:?} {:?} {:?}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_loose_cmp() {
        let a = Cell::text("a");
        let b = Cell::text("b");
        assert_eq!(Cell::loose_cmp(Some(&a), Some(&b)), Ordering::Less);

        let ten = Cell::Number(10.0);
        let nine = Cell::text("9");
        assert_eq!(Cell::loose_cmp(Some(&ten), Some(&nine)), Ordering::Greater);

        // Unordered pairs compare equal.
        let word = Cell::text("x");
        assert_eq!(Cell::loose_cmp(Some(&ten), Some(&word)), Ordering::Equal);
        assert_eq!(Cell::loose_cmp(None, Some(&ten)), Ordering::Equal);
    }

    #[test]
    fn test_loose_eq() {
        assert!(Cell::Number(5.0).loose_eq(&Cell::text("5")));
        assert!(!Cell::Null.loose_eq(&Cell::text("")));
        assert!(Cell::text("a").loose_eq(&Cell::text("a")));
    }

    #[test]
    fn test_from_field() {
        assert_eq!(Cell::from_field(" 12 "), Cell::Number(12.0));
        assert_eq!(Cell::from_field("1.5e3"), Cell::Number(1500.0));
        assert_eq!(Cell::from_field(""), Cell::text(""));
        assert_eq!(Cell::from_field("Alice"), Cell::text("Alice"));
        assert_eq!(Cell::from_field("true"), Cell::text("true"));
    }

    #[test]
    fn test_json_round_trip_keeps_integers() {
        let value: Value = Cell::Number(3.0).into();
        assert_eq!(value.to_string(), "3");
        let value: Value = Cell::Number(3.25).into();
        assert_eq!(value.to_string(), "3.25");

        let cell: Cell = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(cell, Cell::text("[1,2]"));
    }
}
