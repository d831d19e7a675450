//! Main Gridlab struct and public API.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cleaning::{Cleaner, CleaningConfig, CleaningResult};
use crate::error::{GridlabError, Result};
use crate::export::{ExportArtifact, ExportFormat, ExportOptions, Exporter};
use crate::grid::{GridPage, GridQuery, run_query};
use crate::inference::{
    QualityThresholds, StatisticsConfig, analyze_quality, compute_statistics, infer_column_types,
};
use crate::input::{Dataset, InputFormat, Parser, ParserConfig, SourceMetadata};
use crate::schema::{ColumnQuality, ColumnStatistics, ColumnType, QualityStatus, TableProfile};
use crate::validation::{ValidationConfig, ValidationReport, Validator};

/// Grid defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows_per_page: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows_per_page: 50 }
    }
}

/// Configuration for every stage of the pipeline.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridlabConfig {
    pub parser: ParserConfig,
    pub quality: QualityThresholds,
    pub statistics: StatisticsConfig,
    pub grid: GridConfig,
    pub validation: ValidationConfig,
    pub cleaning: CleaningConfig,
    pub export: ExportOptions,
}

impl GridlabConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GridlabError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| {
            GridlabError::Config(format!("invalid config '{}': {}", path.display(), e))
        })
    }
}

/// Full profile of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Present when the dataset was loaded from a file.
    pub source: Option<SourceMetadata>,
    pub column_types: IndexMap<String, ColumnType>,
    pub quality: IndexMap<String, ColumnQuality>,
    pub statistics: IndexMap<String, ColumnStatistics>,
    pub validation: ValidationReport,
    pub summary: ProfileSummary,
}

impl Profile {
    /// Per-column view combining type, quality and statistics.
    pub fn table(&self) -> TableProfile {
        TableProfile::assemble(
            self.summary.total_rows,
            &self.column_types,
            &self.quality,
            &self.statistics,
        )
    }
}

/// Headline numbers of a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub good_columns: usize,
    pub fair_columns: usize,
    pub poor_columns: usize,
    pub total_missing: usize,
    /// Validation quality score, 0-100.
    pub quality_score: f64,
    pub recommendation: String,
}

/// The gridlab profiling engine.
pub struct Gridlab {
    config: GridlabConfig,
    parser: Parser,
    validator: Validator,
    cleaner: Cleaner,
    exporter: Exporter,
}

impl Gridlab {
    /// Create a new instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(GridlabConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: GridlabConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser.clone()),
            validator: Validator::with_config(config.validation.clone()),
            cleaner: Cleaner::with_config(config.cleaning.clone(), config.validation.clone()),
            exporter: Exporter::with_options(config.export.clone()),
            config,
        }
    }

    pub fn config(&self) -> &GridlabConfig {
        &self.config
    }

    /// Load a dataset from a CSV or JSON file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Parse an in-memory CSV or JSON document.
    pub fn load_str(&self, text: &str, format: InputFormat) -> Result<Dataset> {
        self.parser.parse_str(text, format)
    }

    /// Load a file and profile it.
    pub fn profile(&self, path: impl AsRef<Path>) -> Result<Profile> {
        let (data, source) = self.load(path)?;
        let mut profile = self.profile_dataset(&data);
        profile.source = Some(source);
        Ok(profile)
    }

    /// Run inference, quality analysis, statistics and validation.
    pub fn profile_dataset(&self, data: &Dataset) -> Profile {
        let column_types = infer_column_types(data);
        debug!("inferred {} column types", column_types.len());

        let quality = analyze_quality(data, &self.config.quality);
        let statistics = compute_statistics(data, &column_types, &self.config.statistics);
        let validation = self.validator.validate(data);
        let table = TableProfile::assemble(data.row_count(), &column_types, &quality, &statistics);
        let summary = summarize(&table, &validation);

        info!(
            "profiled {} rows x {} columns, quality score {:.1}",
            summary.total_rows, summary.total_columns, summary.quality_score
        );

        Profile {
            source: None,
            column_types,
            quality,
            statistics,
            validation,
            summary,
        }
    }

    /// Filter, sort and paginate.
    ///
    /// A query that leaves `rows_per_page` at zero uses the configured page
    /// size.
    pub fn query(&self, data: &Dataset, query: &GridQuery) -> GridPage {
        if query.rows_per_page == 0 {
            let query = query.clone().with_rows_per_page(self.config.grid.rows_per_page);
            return run_query(data, &query);
        }
        run_query(data, query)
    }

    pub fn validate(&self, data: &Dataset) -> ValidationReport {
        self.validator.validate(data)
    }

    pub fn clean(&self, data: &Dataset) -> CleaningResult {
        self.cleaner.clean(data)
    }

    pub fn export(&self, data: &Dataset, format: ExportFormat) -> Result<ExportArtifact> {
        self.exporter.export(data, format)
    }
}

impl Default for Gridlab {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(table: &TableProfile, validation: &ValidationReport) -> ProfileSummary {
    let poor: Vec<&str> = table
        .columns_with_status(QualityStatus::Poor)
        .map(|c| c.name.as_str())
        .collect();
    let fair_columns = table.columns_with_status(QualityStatus::Fair).count();

    ProfileSummary {
        total_rows: table.row_count,
        total_columns: table.columns.len(),
        good_columns: table.columns_with_status(QualityStatus::Good).count(),
        fair_columns,
        poor_columns: poor.len(),
        total_missing: table.total_missing(),
        quality_score: validation.quality_score,
        recommendation: recommendation(&poor, fair_columns, validation),
    }
}

fn recommendation(poor: &[&str], fair: usize, validation: &ValidationReport) -> String {
    if !poor.is_empty() {
        format!(
            "{} column(s) are missing more than a fifth of their values ({}); consider cleaning before use.",
            poor.len(),
            poor.join(", ")
        )
    } else if validation.total_invalid_values > 0 {
        format!(
            "{} value(s) in {} record(s) do not match their column's format.",
            validation.total_invalid_values, validation.records_with_issues
        )
    } else if fair > 0 {
        format!("{} column(s) have a few missing values.", fair)
    } else {
        "Data quality is good.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_profile_simple_csv() {
        let file = create_test_file("id,name,age\n1,Ann,31\n2,Bob,\n3,Cy,40\n", ".csv");
        let profile = Gridlab::new().profile(file.path()).unwrap();

        assert_eq!(profile.summary.total_rows, 3);
        assert_eq!(profile.summary.total_columns, 3);
        assert_eq!(profile.column_types["age"], ColumnType::Number);
        assert_eq!(profile.quality["age"].missing_count, 1);
        assert_eq!(profile.quality["age"].status, QualityStatus::Poor);
        assert_eq!(profile.summary.poor_columns, 1);
        assert_eq!(profile.summary.total_missing, 1);
        assert!(profile.summary.recommendation.contains("(age)"));
        assert!(profile.source.is_some());
        assert_eq!(profile.table().columns.len(), 3);
    }

    #[test]
    fn test_profile_dataset_without_source() {
        let data = Gridlab::new()
            .load_str(r#"[{"a": 1, "b": true}, {"a": 2, "b": false}]"#, InputFormat::Json)
            .unwrap();
        let profile = Gridlab::new().profile_dataset(&data);
        assert!(profile.source.is_none());
        assert_eq!(profile.column_types["b"], ColumnType::Boolean);
        assert_eq!(profile.summary.recommendation, "Data quality is good.");
    }

    #[test]
    fn test_config_partial_json() {
        let file = create_test_file(r#"{"grid": {"rows_per_page": 10}, "quality": {"poor_missing_ratio": 0.5}}"#, ".json");
        let config = GridlabConfig::load(file.path()).unwrap();
        assert_eq!(config.grid.rows_per_page, 10);
        assert_eq!(config.quality.poor_missing_ratio, 0.5);
        assert_eq!(config.statistics.top_n, 3);
        assert_eq!(config.export.table_name, "synthetic_data");
    }

    #[test]
    fn test_config_rejects_bad_json() {
        let file: NamedTempFile = create_test_file("{not json", ".json");
        assert!(matches!(GridlabConfig::load(file.path()), Err(GridlabError::Config(_))));
    }

    #[test]
    fn test_query_uses_configured_page_size() {
        let config = GridlabConfig {
            grid: GridConfig { rows_per_page: 2 },
            ..GridlabConfig::default()
        };
        let gridlab = Gridlab::with_config(config);
        let data = gridlab
            .load_str("n\n1\n2\n3\n", InputFormat::Delimited)
            .unwrap();

        let page = gridlab.query(&data, &GridQuery::new().with_rows_per_page(0));
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total_pages, 2);
    }
}
