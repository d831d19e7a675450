//! Export formats, options and the produced artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{GridlabError, Result};

/// Output formats the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Jsonl,
    Csv,
    Sql,
    Excel,
    #[cfg(feature = "parquet")]
    Parquet,
    /// Zip of train/test CSVs with metadata and a README.
    TrainTestSplit,
    /// Zip of every data format, the split and a data dictionary.
    Bundle,
}

impl ExportFormat {
    pub const ALL: &'static [ExportFormat] = &[
        ExportFormat::Json,
        ExportFormat::Jsonl,
        ExportFormat::Csv,
        ExportFormat::Sql,
        ExportFormat::Excel,
        #[cfg(feature = "parquet")]
        ExportFormat::Parquet,
        ExportFormat::TrainTestSplit,
        ExportFormat::Bundle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Jsonl => "jsonl",
            ExportFormat::Csv => "csv",
            ExportFormat::Sql => "sql",
            ExportFormat::Excel => "excel",
            #[cfg(feature = "parquet")]
            ExportFormat::Parquet => "parquet",
            ExportFormat::TrainTestSplit => "train_test_split",
            ExportFormat::Bundle => "bundle",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = GridlabError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "xlsx" => return Ok(ExportFormat::Excel),
            #[cfg(not(feature = "parquet"))]
            "parquet" => {
                return Err(GridlabError::UnsupportedFormat(
                    "parquet support not enabled; rebuild with --features parquet".to_string(),
                ));
            }
            _ => {}
        }
        ExportFormat::ALL
            .iter()
            .copied()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| GridlabError::UnsupportedFormat(format!("export format '{}'", s)))
    }
}

/// Knobs for the exporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Stem of the single-file artifact names.
    pub file_stem: String,
    /// Table name for SQL output.
    pub table_name: String,
    /// Training share for train/test splits, within [0.5, 0.9].
    pub split_ratio: f64,
    /// Shuffle seed for train/test splits.
    pub seed: u64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_stem: "synthetic_data".to_string(),
            table_name: "synthetic_data".to_string(),
            split_ratio: 0.8,
            seed: 42,
        }
    }
}

/// One generated file.
///
/// On the wire, text files carry their contents as a string and binary files
/// (workbooks, archives, parquet) as base64, tagged by `encoding`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireFile", try_from = "WireFile")]
pub struct ExportFile {
    pub name: String,
    pub mime: String,
    pub contents: Vec<u8>,
}

impl ExportFile {
    pub fn new(name: impl Into<String>, mime: &str, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.to_string(),
            contents: contents.into(),
        }
    }

    /// Contents as UTF-8, when they are.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }

    /// Whether the mime type names a text format.
    pub fn is_text(&self) -> bool {
        self.mime.starts_with("text/")
            || matches!(self.mime.as_str(), "application/json" | "application/x-jsonlines")
    }
}

/// How `contents` is encoded in the JSON form of an [`ExportFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    Utf8,
    Base64,
}

#[derive(Serialize, Deserialize)]
struct WireFile {
    name: String,
    mime: String,
    encoding: ContentEncoding,
    contents: String,
}

impl From<ExportFile> for WireFile {
    fn from(file: ExportFile) -> Self {
        let is_text = file.is_text();
        let (encoding, contents) = match String::from_utf8(file.contents) {
            Ok(text) if is_text => (ContentEncoding::Utf8, text),
            Ok(text) => (ContentEncoding::Base64, STANDARD.encode(text)),
            Err(e) => (ContentEncoding::Base64, STANDARD.encode(e.into_bytes())),
        };
        WireFile {
            name: file.name,
            mime: file.mime,
            encoding,
            contents,
        }
    }
}

impl TryFrom<WireFile> for ExportFile {
    type Error = base64::DecodeError;

    fn try_from(wire: WireFile) -> std::result::Result<Self, Self::Error> {
        let contents = match wire.encoding {
            ContentEncoding::Utf8 => wire.contents.into_bytes(),
            ContentEncoding::Base64 => STANDARD.decode(wire.contents)?,
        };
        Ok(ExportFile {
            name: wire.name,
            mime: wire.mime,
            contents,
        })
    }
}

/// Everything one export produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub files: Vec<ExportFile>,
}

impl ExportArtifact {
    /// Look up a file by name.
    pub fn file(&self, name: &str) -> Option<&ExportFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| GridlabError::io(dir, e))?;
        }

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.contents).map_err(|e| GridlabError::io(&path, e))?;
            written.push(path);
        }
        Ok(written)
    }
}
