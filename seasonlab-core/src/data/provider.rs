//! Raw bar records, bar sources, and structured data errors.
//!
//! The `BarSource` trait abstracts over where weekly bars come from (a CSV
//! export, a saved chart-API response, the synthetic generator) so the runner
//! can swap implementations and tests can feed fixed data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{parse_utc_date, utc_date_from_timestamp};

/// Raw weekly bar as delivered by a source, before validation.
///
/// Every field is nullable: providers emit placeholder rows with no prices,
/// and a row whose timestamp could not be resolved has no date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBar {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

impl RawBar {
    pub fn new(date: NaiveDate, open: Option<f64>, close: Option<f64>) -> Self {
        Self {
            date: Some(date),
            open,
            close,
        }
    }

    /// Row keyed by a Unix timestamp in seconds (UTC).
    pub fn from_timestamp(secs: i64, open: Option<f64>, close: Option<f64>) -> Self {
        Self {
            date: utc_date_from_timestamp(secs),
            open,
            close,
        }
    }

    /// Row keyed by an ISO date or RFC 3339 string.
    pub fn from_date_str(text: &str, open: Option<f64>, close: Option<f64>) -> Self {
        Self {
            date: parse_utc_date(text),
            open,
            close,
        }
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("CSV import error: {0}")]
    Csv(String),

    #[error("CSV header is missing a '{0}' column")]
    MissingColumn(&'static str),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("chart response reported an error: {code}: {description}")]
    ChartError { code: String, description: String },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of loading one instrument's history.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvImport,
    ChartJson,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CsvImport => "csv",
            Self::ChartJson => "chart-json",
            Self::Synthetic => "synthetic",
        };
        f.write_str(s)
    }
}

/// A source of raw weekly bars for a single instrument.
pub trait BarSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Load the full history, oldest bar first.
    fn load(&self, symbol: &str) -> Result<FetchResult, DataError>;
}
