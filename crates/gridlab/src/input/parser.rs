//! CSV/JSON loader with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{GridlabError, Result};
use super::cell::Cell;
use super::source::{Dataset, Row, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Input format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Delimited,
    Json,
}

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Convert numeric-looking fields to numbers.
    pub infer_numbers: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
            infer_numbers: true,
        }
    }
}

/// Loads tabular data files into a [`Dataset`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the dataset and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| GridlabError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| GridlabError::io(path, e))?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| GridlabError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let input_format = detect_format(path, &contents);
        let (dataset, format) = match input_format {
            InputFormat::Json => (self.parse_json_bytes(&contents)?, "json".to_string()),
            InputFormat::Delimited => {
                let delimiter = match self.config.delimiter {
                    Some(d) => d,
                    None => detect_delimiter(&contents)?,
                };
                let format = match delimiter {
                    b'\t' => "tsv",
                    b',' => "csv",
                    b';' => "csv-semicolon",
                    b'|' => "psv",
                    _ => "delimited",
                };
                (self.parse_delimited(&contents, delimiter)?, format.to_string())
            }
        };

        debug!(
            "loaded {} ({}): {} rows, {} columns",
            path.display(),
            format,
            dataset.row_count(),
            dataset.column_count()
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            dataset.row_count(),
            dataset.column_count(),
        );

        Ok((dataset, metadata))
    }

    /// Parse delimited text held in memory, auto-detecting the delimiter.
    pub fn parse_csv_str(&self, text: &str) -> Result<Dataset> {
        let bytes = text.as_bytes();
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_delimited(bytes, delimiter)
    }

    /// Parse a JSON document held in memory.
    pub fn parse_json_str(&self, text: &str) -> Result<Dataset> {
        self.parse_json_bytes(text.as_bytes())
    }

    /// Parse content in the given format.
    pub fn parse_str(&self, text: &str, format: InputFormat) -> Result<Dataset> {
        match format {
            InputFormat::Delimited => self.parse_csv_str(text),
            InputFormat::Json => self.parse_json_str(text),
        }
    }

    fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(GridlabError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            if record.len() != headers.len() {
                warn!(
                    "row {} has {} fields, expected {}",
                    row_idx + 1,
                    record.len(),
                    headers.len()
                );
            }

            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let raw = record.get(i).unwrap_or("");
                    let cell = if self.config.infer_numbers {
                        Cell::from_field(raw)
                    } else {
                        Cell::text(raw.trim())
                    };
                    (header.clone(), cell)
                })
                .collect();
            rows.push(row);
        }

        Ok(Dataset::new(rows))
    }

    fn parse_json_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let document: Value = serde_json::from_slice(bytes)?;

        let items = match document {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(GridlabError::UnsupportedFormat(
                        "JSON object must contain a 'data' array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(GridlabError::UnsupportedFormat(
                    "JSON must be an array of objects or {\"data\": [...]}".to_string(),
                ))
            }
        };

        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let Value::Object(object) = item else {
                return Err(GridlabError::UnsupportedFormat(format!(
                    "Element {} is not an object",
                    idx
                )));
            };
            rows.push(
                object
                    .into_iter()
                    .map(|(k, v)| (k, Cell::from(v)))
                    .collect::<Row>(),
            );
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
        }

        Ok(Dataset::new(rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide between JSON and delimited text from the extension, falling back
/// to the first non-blank byte.
fn detect_format(path: &Path, contents: &[u8]) -> InputFormat {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "json" => InputFormat::Json,
        "csv" | "tsv" | "txt" | "psv" => InputFormat::Delimited,
        _ => match contents.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'[') | Some(b'{') => InputFormat::Json,
            _ => InputFormat::Delimited,
        },
    }
}

/// Records sampled per candidate delimiter.
const SNIFF_RECORDS: usize = 10;

/// How well a delimiter splits the opening records.
///
/// Ordered so that splitting every record alike beats any field count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct DelimiterFit {
    consistent: bool,
    fields: usize,
}

/// Pick the delimiter whose split of the first records fits best; ties go
/// to the earlier entry of `DELIMITERS`.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(GridlabError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best: Option<(DelimiterFit, u8)> = None;
    for &delimiter in DELIMITERS {
        let fit = sniff(bytes, delimiter);
        if fit.fields < 2 {
            continue;
        }
        if best.is_none_or(|(best_fit, _)| fit > best_fit) {
            best = Some((fit, delimiter));
        }
    }

    let delimiter = best.map_or(b',', |(_, d)| d);
    debug!("detected delimiter {:?}", delimiter as char);
    Ok(delimiter)
}

/// Read the opening records with `delimiter`, quotes respected.
fn sniff(bytes: &[u8], delimiter: u8) -> DelimiterFit {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let lengths: Vec<usize> = reader
        .records()
        .take(SNIFF_RECORDS)
        .filter_map(|r| r.ok())
        .map(|r| r.len())
        .collect();

    let fields = lengths.first().copied().unwrap_or(0);
    DelimiterFit {
        consistent: lengths.iter().all(|&n| n == fields),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"name;note\n\"Smith, J\";x\n\"Lee, K\";y\n";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_prefers_consistent_split() {
        // Commas give more fields on the first line but not on the others.
        let data = b"a|b,c,d,e\n1|2\n3|4\n";
        assert_eq!(detect_delimiter(data).unwrap(), b'|');
    }

    #[test]
    fn test_detect_delimiter_single_column_defaults_to_comma() {
        assert_eq!(detect_delimiter(b"name\nAnn\nBob\n").unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_blank_input() {
        assert!(matches!(detect_delimiter(b" \n\n"), Err(GridlabError::EmptyData(_))));
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = parser.parse_csv_str("id,name\n1,Alice\n2,Bob").unwrap();

        assert_eq!(data.columns(), vec!["id", "name"]);
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.get(0, "id"), Some(&Cell::Number(1.0)));
        assert_eq!(data.get(1, "name"), Some(&Cell::text("Bob")));
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let parser = Parser::new();
        let data = parser
            .parse_csv_str("name,city\n\"Smith, Jane\",\"New York\"\nBob,LA\n")
            .unwrap();

        assert_eq!(data.get(0, "name"), Some(&Cell::text("Smith, Jane")));
        assert_eq!(data.row_count(), 2);
    }

    #[test]
    fn test_parse_csv_pads_short_rows_and_skips_blank_lines() {
        let parser = Parser::new();
        let data = parser.parse_csv_str("a,b,c\n1,2\n\n3,4,5\n").unwrap();

        assert_eq!(data.row_count(), 2);
        assert_eq!(data.get(0, "c"), Some(&Cell::text("")));
    }

    #[test]
    fn test_parse_json_array_and_wrapper() {
        let parser = Parser::new();
        let data = parser
            .parse_json_str(r#"[{"a": 1, "b": "x"}, {"a": null, "b": true}]"#)
            .unwrap();
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.get(1, "a"), Some(&Cell::Null));
        assert_eq!(data.get(1, "b"), Some(&Cell::Bool(true)));

        let wrapped = parser
            .parse_json_str(r#"{"data": [{"a": 1}]}"#)
            .unwrap();
        assert_eq!(wrapped.row_count(), 1);
    }

    #[test]
    fn test_parse_json_rejects_other_shapes() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_json_str(r#"{"rows": []}"#),
            Err(GridlabError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            parser.parse_json_str("[1, 2]"),
            Err(GridlabError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            parser.parse_json_str("not json"),
            Err(GridlabError::Json(_))
        ));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.json"), b"x"), InputFormat::Json);
        assert_eq!(detect_format(Path::new("a.csv"), b"[1]"), InputFormat::Delimited);
        assert_eq!(detect_format(Path::new("a.dat"), b"  [{}]"), InputFormat::Json);
        assert_eq!(detect_format(Path::new("a"), b"a,b"), InputFormat::Delimited);
    }

    #[test]
    fn test_empty_input() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_csv_str(""),
            Err(GridlabError::EmptyData(_))
        ));
    }
}
