//! Serializers for each export format.

use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde_json::{Value, json};

use crate::error::{GridlabError, Result};
use crate::inference::infer_column_types;
use crate::input::{Cell, Dataset, Row, format_number};
use crate::schema::ColumnType;

use super::archive::Archive;
use super::formats::{ExportArtifact, ExportFile, ExportFormat, ExportOptions};
use super::workbook::to_xlsx;

const ZIP_MIME: &str = "application/zip";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Produces export artifacts from a dataset.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export the dataset in the given format.
    pub fn export(&self, data: &Dataset, format: ExportFormat) -> Result<ExportArtifact> {
        if data.is_empty() {
            return Err(GridlabError::EmptyData("no rows to export".to_string()));
        }

        let stem = &self.options.file_stem;
        let files = match format {
            ExportFormat::Json => vec![ExportFile::new(
                format!("{}.json", stem),
                "application/json",
                serde_json::to_string_pretty(data)?,
            )],
            ExportFormat::Jsonl => vec![ExportFile::new(
                format!("{}.jsonl", stem),
                "application/x-jsonlines",
                to_jsonl(&data.rows)?,
            )],
            ExportFormat::Csv => vec![ExportFile::new(
                format!("{}.csv", stem),
                "text/csv",
                to_csv(&data.columns(), &data.rows)?,
            )],
            ExportFormat::Sql => vec![ExportFile::new(
                format!("{}.sql", stem),
                "text/sql",
                to_sql(data, &self.options.table_name),
            )],
            ExportFormat::Excel => vec![ExportFile::new(
                format!("{}.xlsx", stem),
                XLSX_MIME,
                to_xlsx(data)?,
            )],
            #[cfg(feature = "parquet")]
            ExportFormat::Parquet => vec![ExportFile::new(
                format!("{}.parquet", stem),
                "application/x-parquet",
                super::columnar::to_parquet(data)?,
            )],
            ExportFormat::TrainTestSplit => vec![ExportFile::new(
                format!("{}_train_test_split.zip", stem),
                ZIP_MIME,
                self.train_test_split(data)?,
            )],
            ExportFormat::Bundle => vec![ExportFile::new(
                format!("{}_bundle.zip", stem),
                ZIP_MIME,
                self.bundle(data)?,
            )],
        };

        debug!("exported {} rows as {} ({} files)", data.row_count(), format, files.len());
        Ok(ExportArtifact { format, files })
    }

    /// Shuffle with the configured seed and cut at `split_ratio`.
    fn split_rows(&self, data: &Dataset) -> Result<(Vec<Row>, Vec<Row>)> {
        let ratio = self.options.split_ratio;
        if !(0.5..=0.9).contains(&ratio) {
            return Err(GridlabError::Export(format!(
                "split ratio {} is outside [0.5, 0.9]",
                ratio
            )));
        }

        let mut shuffled: Vec<&Row> = data.rows.iter().collect();
        fastrand::Rng::with_seed(self.options.seed).shuffle(&mut shuffled);

        let split_idx = (shuffled.len() as f64 * ratio).floor() as usize;
        let (train, test) = shuffled.split_at(split_idx);
        Ok((
            train.iter().map(|r| (*r).clone()).collect(),
            test.iter().map(|r| (*r).clone()).collect(),
        ))
    }

    /// Zip of `train.csv`, `test.csv`, `metadata.json` and `README.md`.
    fn train_test_split(&self, data: &Dataset) -> Result<Vec<u8>> {
        let (train, test) = self.split_rows(data)?;
        let ratio = self.options.split_ratio;

        let columns = data.columns();
        let types = infer_column_types(data);
        let metadata = json!({
            "total_samples": data.row_count(),
            "train_samples": train.len(),
            "test_samples": test.len(),
            "split_ratio": ratio,
            "seed": self.options.seed,
            "columns": columns,
            "data_types": types.iter().map(|(k, v)| (k.clone(), v.label())).collect::<IndexMap<_, _>>(),
        });

        let mut archive = Archive::new();
        archive.add("train.csv", to_csv(&columns, &train)?.as_bytes())?;
        archive.add("test.csv", to_csv(&columns, &test)?.as_bytes())?;
        archive.add("metadata.json", serde_json::to_string_pretty(&metadata)?.as_bytes())?;
        archive.add(
            "README.md",
            split_readme(data.row_count(), train.len(), test.len(), ratio, &types).as_bytes(),
        )?;
        archive.finish()
    }

    /// Zip of every data format, the ML split and a data dictionary.
    fn bundle(&self, data: &Dataset) -> Result<Vec<u8>> {
        let (train, test) = self.split_rows(data)?;
        let columns = data.columns();
        let stem = &self.options.file_stem;

        let mut archive = Archive::new();
        archive.add(&format!("data/{}.csv", stem), to_csv(&columns, &data.rows)?.as_bytes())?;
        archive.add(&format!("data/{}.json", stem), serde_json::to_string_pretty(data)?.as_bytes())?;
        archive.add(&format!("data/{}.jsonl", stem), to_jsonl(&data.rows)?.as_bytes())?;
        archive.add(&format!("data/{}.xlsx", stem), &to_xlsx(data)?)?;
        archive.add("ml_ready/train.csv", to_csv(&columns, &train)?.as_bytes())?;
        archive.add("ml_ready/test.csv", to_csv(&columns, &test)?.as_bytes())?;
        archive.add(
            "metadata/data_dictionary.json",
            serde_json::to_string_pretty(&data_dictionary(data))?.as_bytes(),
        )?;
        archive.finish()
    }
}

/// One JSON object per line.
pub fn to_jsonl(rows: &[Row]) -> Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}

/// CSV with a header of `columns`; absent keys and nulls become empty fields.
pub fn to_csv(columns: &[&str], rows: &[Row]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    writer.write_record(columns)?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|c| match row.get(*c) {
                None | Some(Cell::Null) => String::new(),
                Some(cell) => cell.to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GridlabError::Export(format!("failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| GridlabError::Export(format!("CSV is not UTF-8: {}", e)))
}

/// `CREATE TABLE` followed by one `INSERT` per row.
pub fn to_sql(data: &Dataset, table_name: &str) -> String {
    let columns = data.columns();
    let types = infer_column_types(data);
    let table = escape_identifier(table_name);

    let definitions: Vec<String> = columns
        .iter()
        .map(|c| {
            let sql_type = sql_type(data, c, types.get(*c).copied().unwrap_or_default());
            format!("`{}` {}", escape_identifier(c), sql_type)
        })
        .collect();

    let mut out = format!(
        "CREATE TABLE IF NOT EXISTS `{}` (\n  {}\n);\n\n",
        table,
        definitions.join(",\n  ")
    );

    for row in &data.rows {
        let values: Vec<String> = columns.iter().map(|c| sql_literal(row.get(*c))).collect();
        out.push_str(&format!(
            "INSERT INTO `{}` VALUES ({});\n",
            table,
            values.join(", ")
        ));
    }
    out
}

/// Integral number columns are INTEGER, other number columns REAL.
fn sql_type(data: &Dataset, column: &str, column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Number => {
            let integral = data.present_values(column).all(|v| match v {
                Cell::Number(n) => n.fract() == 0.0,
                _ => false,
            });
            if integral { "INTEGER" } else { "REAL" }
        }
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Date => "TIMESTAMP",
        ColumnType::String => "TEXT",
    }
}

fn sql_literal(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Null) => "NULL".to_string(),
        Some(Cell::Number(n)) if n.is_finite() => format_number(*n),
        Some(Cell::Number(_)) => "NULL".to_string(),
        Some(Cell::Bool(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Some(Cell::Text(s)) => format!("'{}'", s.replace('\'', "''")),
    }
}

fn escape_identifier(name: &str) -> String {
    name.replace('`', "``")
}

/// Per column: type, distinct and missing counts, up to five sample values.
fn data_dictionary(data: &Dataset) -> Vec<Value> {
    infer_column_types(data)
        .iter()
        .map(|(name, column_type)| {
            let mut distinct: IndexSet<String> = IndexSet::new();
            for cell in data.present_values(name) {
                distinct.insert(cell.to_string());
            }
            let missing = data
                .column_values(name)
                .filter(|c| Cell::is_missing_opt(*c))
                .count();
            let samples: Vec<&String> = distinct.iter().take(5).collect();
            json!({
                "name": name,
                "type": column_type.label(),
                "unique_values": distinct.len(),
                "missing_values": missing,
                "sample_values": samples,
            })
        })
        .collect()
}

fn split_readme(
    total: usize,
    train: usize,
    test: usize,
    ratio: f64,
    types: &IndexMap<String, ColumnType>,
) -> String {
    let mut readme = format!(
        "# Synthetic Dataset - Train/Test Split\n\n\
         ## Dataset Information\n\
         - Total samples: {total}\n\
         - Training set: {train} samples ({:.0}%)\n\
         - Test set: {test} samples ({:.0}%)\n\
         - Generated on: {}\n\n\
         ## File Description\n\
         - `train.csv`: Training dataset ({train} samples)\n\
         - `test.csv`: Test dataset ({test} samples)\n\
         - `metadata.json`: Dataset metadata and column information\n\n\
         ## Columns\n\n\
         | Column | Type |\n\
         |--------|------|\n",
        ratio * 100.0,
        (1.0 - ratio) * 100.0,
        Utc::now().format("%Y-%m-%d"),
    );
    for (name, column_type) in types {
        readme.push_str(&format!("| {} | {} |\n", name, column_type.label()));
    }
    readme
}
