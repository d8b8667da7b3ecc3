//! Serializable analysis configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [input]
//! symbol = "SPY"
//! path = "data/spy_weekly.csv"
//! format = "auto"        # auto | csv | chart-json
//! synthetic = false      # fall back to generated bars when no file
//!
//! [analysis]
//! filter = "after-down"  # all | after-up | after-down
//! start = "2005-01-01"
//! end = "2024-12-31"
//! sort_by = "avg_return"
//! direction = "descending"
//!
//! [output]
//! dir = "results"
//! ```
//!
//! Every table and field is optional; the defaults analyze synthetic SPY
//! bars with the `all` filter.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use seasonlab_core::data::SyntheticConfig;
use seasonlab_core::table::{SortDirection, SummaryColumn};
use seasonlab_core::FilterMode;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("invalid config TOML: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the input file is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Pick by file extension.
    #[default]
    Auto,
    Csv,
    ChartJson,
}

impl InputFormat {
    /// Resolve `Auto` against a path's extension.
    pub fn resolve(self, path: &Path) -> Option<InputFormat> {
        match self {
            Self::Auto => {
                let ext = path.extension()?.to_str()?.to_ascii_lowercase();
                match ext.as_str() {
                    "csv" | "txt" => Some(Self::Csv),
                    "json" => Some(Self::ChartJson),
                    _ => None,
                }
            }
            other => Some(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub symbol: String,
    pub path: Option<PathBuf>,
    pub format: InputFormat,
    /// Generate bars when `path` is unset. Results are tagged synthetic.
    pub synthetic: bool,
    /// Overrides for the generator; unset fields keep their defaults.
    pub synthetic_config: Option<SyntheticConfig>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".into(),
            path: None,
            format: InputFormat::Auto,
            synthetic: true,
            synthetic_config: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    pub filter: FilterMode,
    /// Inclusive lower bound on bar dates.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on bar dates.
    pub end: Option<NaiveDate>,
    /// Typed sort applied to the summary rows before export.
    pub sort_by: Option<SummaryColumn>,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: InputConfig,
    pub analysis: AnalysisSection,
    pub output: OutputConfig,
}

impl AnalysisConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("input.symbol must not be empty".into()));
        }
        if let (Some(start), Some(end)) = (self.analysis.start, self.analysis.end) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "analysis.start {start} is after analysis.end {end}"
                )));
            }
        }
        if let Some(path) = &self.input.path {
            if self.input.format.resolve(path).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "cannot infer input format from {}; set input.format",
                    path.display()
                )));
            }
        }
        if self.input.path.is_none() && !self.input.synthetic {
            return Err(ConfigError::Invalid(
                "input.path is required when input.synthetic is false".into(),
            ));
        }
        if let Some(synth) = &self.input.synthetic_config {
            if synth.volatility < 0.0 || synth.start_price <= 0.0 {
                return Err(ConfigError::Invalid(
                    "synthetic_config needs volatility >= 0 and start_price > 0".into(),
                ));
            }
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
