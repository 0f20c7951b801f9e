//! Settings file handling.
//!
//! Every field is optional; a missing section keeps its default:
//! ```toml
//! [header]
//! manual_header = true
//! header_row_index = 6
//!
//! [parsing]
//! date_format = "%d-%b-%Y"
//! delimiter = ","
//!
//! [anomaly]
//! z_threshold = 3.0
//!
//! [budget]
//! target = "200000"
//! period = "current-month"
//!
//! [[category]]
//! name = "Transport"
//! keywords = ["uber", "bolt"]
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendlens_analytics::{Budget, DEFAULT_BUDGET_TARGET, DEFAULT_Z_THRESHOLD};
use spendlens_core::{BudgetPeriod, CatalogError, CategoryKeywords, KeywordCatalog, Money};
use spendlens_import::{HeaderStrategy, MappingOptions, MAX_AMOUNT, MAX_HEADER_ROW};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pipeline::{Pipeline, PipelineConfig};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("header_row_index {0} is out of range (0-{max})", max = MAX_HEADER_ROW)]
    HeaderRowOutOfRange(usize),
    #[error("z_threshold must be a finite positive number, got {0}")]
    InvalidThreshold(f64),
    #[error("Budget target {0} is out of range (at most {max} either way)", max = MAX_AMOUNT)]
    InvalidBudgetTarget(Decimal),
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
    #[error("Invalid category catalog: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSettings {
    /// Use `header_row_index` instead of keyword detection. On by default,
    /// pointing at the line most bank exports put their labels on.
    pub manual_header: bool,
    pub header_row_index: usize,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            manual_header: true,
            header_row_index: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingSettings {
    pub date_format: Option<String>,
    pub delimiter: char,
}

impl Default for ParsingSettings {
    fn default() -> Self {
        Self {
            date_format: None,
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalySettings {
    pub z_threshold: f64,
}

impl Default for AnomalySettings {
    fn default() -> Self {
        Self {
            z_threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    pub target: Decimal,
    pub period: BudgetPeriod,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            target: DEFAULT_BUDGET_TARGET.as_decimal(),
            period: BudgetPeriod::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub header: HeaderSettings,
    pub parsing: ParsingSettings,
    pub anomaly: AnomalySettings,
    pub budget: BudgetSettings,
    /// Replaces the built-in catalog when non-empty.
    #[serde(rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryKeywords>,
}

impl Settings {
    /// `config.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "spendlens", "Spendlens")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// An explicit path must exist; the default location may be absent.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header.header_row_index > MAX_HEADER_ROW {
            return Err(ConfigError::HeaderRowOutOfRange(self.header.header_row_index));
        }
        let threshold = self.anomaly.z_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.budget.target.abs() > MAX_AMOUNT {
            return Err(ConfigError::InvalidBudgetTarget(self.budget.target));
        }
        if !self.parsing.delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(self.parsing.delimiter));
        }
        self.catalog()?;
        Ok(())
    }

    pub fn catalog(&self) -> Result<KeywordCatalog, CatalogError> {
        if self.categories.is_empty() {
            Ok(KeywordCatalog::default())
        } else {
            KeywordCatalog::new(self.categories.clone())
        }
    }

    pub fn header_strategy(&self) -> HeaderStrategy {
        HeaderStrategy::from_config(self.header.manual_header, self.header.header_row_index)
    }

    pub fn budget(&self) -> Budget {
        Budget {
            target: Money::from_decimal(self.budget.target),
            period: self.budget.period,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            header: self.header_strategy(),
            mapping: MappingOptions {
                date_format: self.parsing.date_format.clone(),
            },
            z_threshold: self.anomaly.z_threshold,
        }
    }

    pub fn pipeline(&self) -> Result<Pipeline, ConfigError> {
        Ok(Pipeline::new(self.pipeline_config(), self.catalog()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.header.manual_header);
        assert_eq!(settings.header.header_row_index, 6);
        assert_eq!(settings.anomaly.z_threshold, 3.0);
        assert_eq!(settings.budget().target, Money::from_units(200_000));
        assert_eq!(settings.budget().period, BudgetPeriod::CurrentMonth);
        assert_eq!(settings.header_strategy(), HeaderStrategy::Explicit { row: 6 });
    }

    #[test]
    fn detection_can_be_switched_on() {
        let settings = Settings::from_toml("[header]\nmanual_header = false\n").unwrap();
        assert_eq!(settings.header_strategy(), HeaderStrategy::Detect);
    }

    #[test]
    fn rejects_out_of_range_budget_target() {
        let content = "[budget]\ntarget = \"100000000000000000000\"\n";
        let err = Settings::from_toml(content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBudgetTarget(_)));
    }

    #[test]
    fn full_file() {
        let settings = Settings::from_toml(
            r#"
            [header]
            manual_header = true
            header_row_index = 11

            [parsing]
            date_format = "%d-%b-%Y"
            delimiter = ";"

            [anomaly]
            z_threshold = 2.5

            [budget]
            target = "150000"
            period = "previous-month"

            [[category]]
            name = "Transport"
            keywords = ["Uber", " bolt "]
            "#,
        )
        .unwrap();

        assert_eq!(settings.header_strategy(), HeaderStrategy::Explicit { row: 11 });
        assert_eq!(settings.parsing.delimiter, ';');
        assert_eq!(settings.pipeline_config().mapping.date_format.as_deref(), Some("%d-%b-%Y"));
        assert_eq!(settings.budget().target, Money::from_units(150_000));
        assert_eq!(settings.budget().period, BudgetPeriod::PreviousMonth);

        let catalog = settings.catalog().unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Transport", "Other"]);
        assert_eq!(catalog.categories()[0].keywords, vec!["uber", "bolt"]);
    }

    #[test]
    fn rejects_header_row_above_limit() {
        let err = Settings::from_toml("[header]\nheader_row_index = 51\n").unwrap_err();
        assert!(matches!(err, ConfigError::HeaderRowOutOfRange(51)));
        assert!(Settings::from_toml("[header]\nheader_row_index = 50\n").is_ok());
    }

    #[test]
    fn rejects_bad_threshold() {
        let err = Settings::from_toml("[anomaly]\nz_threshold = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));
        let err = Settings::from_toml("[anomaly]\nz_threshold = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));
    }

    #[test]
    fn rejects_duplicate_categories() {
        let err = Settings::from_toml(
            "[[category]]\nname = \"Food\"\n[[category]]\nname = \"Food\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(CatalogError::DuplicateCategory(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Settings::from_toml("[header\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[budget]\ntarget = 5000\nperiod = \"all-time\"").unwrap();

        let settings = Settings::load_or_default(Some(file.path())).unwrap();
        assert_eq!(settings.budget().target, Money::from_units(5_000));
        assert_eq!(settings.budget().period, BudgetPeriod::AllTime);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_or_default(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
