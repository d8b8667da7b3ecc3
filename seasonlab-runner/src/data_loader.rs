//! Bar loading and data resolution for the runner.
//!
//! Given one symbol, reads its weekly history and turns it into a validated
//! return series. Implements the fallback policy:
//! 1. If an input file is configured → read it with the matching source
//! 2. If the file cannot be opened and synthetic data is enabled → generate
//!    synthetic bars (tagged)
//! 3. If no file is configured and synthetic data is enabled → generate
//! 4. Otherwise → fail with a clear error
//!
//! A file that opens but does not parse is always an error. Synthetic data is
//! a developer convenience; results built on it carry `has_synthetic = true`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use seasonlab_core::data::{
    dataset_hash, BarSource, ChartFileSource, CsvFileSource, DataError, DataSource, FetchResult,
    SyntheticConfig, SyntheticSource,
};
use seasonlab_core::domain::WeeklyBar;
use seasonlab_core::series::build_series_with_report;

use crate::config::{AnalysisConfig, InputFormat};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no input file for '{symbol}' and synthetic data is disabled")]
    NoInput { symbol: String },

    #[error("cannot infer input format from '{0}' (set the format explicitly)")]
    UnknownFormat(String),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling how bars are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub symbol: String,
    /// Input file. `None` means synthetic-only.
    pub path: Option<PathBuf>,
    pub format: InputFormat,
    /// If true, generate synthetic bars when no file is available.
    pub synthetic: bool,
    pub synthetic_config: SyntheticConfig,
    /// Inclusive date window applied after validation.
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl LoadOptions {
    /// Synthetic-only options for `symbol`.
    pub fn synthetic(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            path: None,
            format: InputFormat::Auto,
            synthetic: true,
            synthetic_config: SyntheticConfig::default(),
            start: None,
            end: None,
        }
    }

    /// Options for reading `path` with no synthetic fallback.
    pub fn from_path(symbol: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            synthetic: false,
            ..Self::synthetic(symbol)
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            symbol: config.input.symbol.clone(),
            path: config.input.path.clone(),
            format: config.input.format,
            synthetic: config.input.synthetic,
            synthetic_config: config.input.synthetic_config.clone().unwrap_or_default(),
            start: config.analysis.start,
            end: config.analysis.end,
        }
    }

    fn in_window(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Result of loading bars, including data source provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub symbol: String,
    /// Validated bars inside the window, oldest first.
    pub bars: Vec<WeeklyBar>,
    /// Rows delivered by the source before validation.
    pub raw_count: usize,
    /// Dropped rows per reason.
    pub skipped: BTreeMap<String, usize>,
    /// Valid bars outside the configured date window.
    pub out_of_window: usize,
    pub source: DataSource,
    /// BLAKE3 over the analyzed bars.
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

/// Pick the bar source for a file path and format.
pub fn source_for(path: PathBuf, format: InputFormat) -> Result<Box<dyn BarSource>, LoadError> {
    match format.resolve(&path) {
        Some(InputFormat::Csv) => Ok(Box::new(CsvFileSource::new(path))),
        Some(InputFormat::ChartJson) => Ok(Box::new(ChartFileSource::new(path))),
        Some(InputFormat::Auto) | None => Err(LoadError::UnknownFormat(path.display().to_string())),
    }
}

/// Load one symbol's history, with synthetic fallback.
pub fn load_bars(opts: &LoadOptions) -> Result<LoadedData, LoadError> {
    let fetched = fetch(opts)?;
    Ok(prepare(opts, fetched))
}

fn fetch(opts: &LoadOptions) -> Result<FetchResult, LoadError> {
    let symbol = opts.symbol.as_str();

    // Step 1: configured file
    if let Some(path) = &opts.path {
        let source = source_for(path.clone(), opts.format)?;
        match source.load(symbol) {
            Ok(fetched) => {
                info!(symbol, source = source.name(), path = %path.display(), rows = fetched.bars.len(), "loaded input");
                return Ok(fetched);
            }
            // Step 2: unreadable file falls back only when allowed
            Err(DataError::Io { path: p, reason }) if opts.synthetic => {
                warn!(symbol, path = %p, %reason, "input unreadable, using synthetic data; results will be tagged as synthetic");
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Step 3: synthetic
    if opts.synthetic {
        if opts.path.is_none() {
            warn!(symbol, "no input file, generating synthetic data; results will be tagged as synthetic");
        }
        let source = SyntheticSource::new(opts.synthetic_config.clone());
        return Ok(source.load(symbol)?);
    }

    // Step 4: fail
    Err(LoadError::NoInput {
        symbol: symbol.to_string(),
    })
}

fn prepare(opts: &LoadOptions, fetched: FetchResult) -> LoadedData {
    let report = build_series_with_report(&fetched.bars);
    if report.skipped_total() > 0 {
        debug!(symbol = %fetched.symbol, skipped = ?report.skipped, "dropped invalid rows");
    }

    let total = report.bars.len();
    let bars: Vec<WeeklyBar> = report
        .bars
        .into_iter()
        .filter(|b| opts.in_window(b.date))
        .collect();
    let out_of_window = total - bars.len();

    LoadedData {
        symbol: fetched.symbol,
        dataset_hash: dataset_hash(&bars),
        raw_count: report.raw_count,
        skipped: report.skipped,
        out_of_window,
        has_synthetic: fetched.source == DataSource::Synthetic,
        source: fetched.source,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    const CSV: &str = "\
date,open,close
2023-01-02,100,102
2023-01-09,102,101
2023-01-16,,101
2024-01-01,101,103
";

    #[test]
    fn load_from_csv_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "spy.csv", CSV);

        let loaded = load_bars(&LoadOptions::from_path("SPY", path)).unwrap();

        assert_eq!(loaded.bars.len(), 3);
        assert_eq!(loaded.raw_count, 4);
        assert_eq!(loaded.skipped.get("missing open"), Some(&1));
        assert_eq!(loaded.source, DataSource::CsvImport);
        assert!(!loaded.has_synthetic);
        assert!(!loaded.dataset_hash.is_empty());
    }

    #[test]
    fn load_from_chart_json() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"chart":{"result":[{"timestamp":[1704067200,1704672000],
            "indicators":{"quote":[{"open":[1.0,2.0],"close":[2.0,1.0]}]}}],"error":null}}"#;
        let path = write_file(&dir, "spy.json", body);

        let loaded = load_bars(&LoadOptions::from_path("SPY", path)).unwrap();
        assert_eq!(loaded.source, DataSource::ChartJson);
        assert_eq!(loaded.bars.len(), 2);
    }

    #[test]
    fn missing_file_fails_without_synthetic() {
        let opts = LoadOptions::from_path("SPY", "/no/such/file.csv");
        let err = load_bars(&opts).unwrap_err();
        assert!(matches!(err, LoadError::Data(DataError::Io { .. })));
    }

    #[test]
    fn missing_file_falls_back_when_synthetic_enabled() {
        let opts = LoadOptions {
            synthetic: true,
            ..LoadOptions::from_path("SPY", "/no/such/file.csv")
        };
        let loaded = load_bars(&opts).unwrap();
        assert!(loaded.has_synthetic);
        assert_eq!(loaded.source, DataSource::Synthetic);
    }

    #[test]
    fn malformed_file_never_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "open,close\n1,2\n");
        let opts = LoadOptions {
            synthetic: true,
            ..LoadOptions::from_path("SPY", path)
        };
        assert!(matches!(
            load_bars(&opts),
            Err(LoadError::Data(DataError::MissingColumn("date")))
        ));
    }

    #[test]
    fn no_input_without_synthetic_is_an_error() {
        let opts = LoadOptions {
            synthetic: false,
            ..LoadOptions::synthetic("SPY")
        };
        let err = load_bars(&opts).unwrap_err();
        assert!(err.to_string().contains("synthetic data is disabled"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = source_for(PathBuf::from("bars.parquet"), InputFormat::Auto).err();
        assert!(matches!(err, Some(LoadError::UnknownFormat(_))));
    }

    #[test]
    fn window_trims_bars_and_counts_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "spy.csv", CSV);
        let opts = LoadOptions {
            start: NaiveDate::from_ymd_opt(2023, 1, 5),
            ..LoadOptions::from_path("SPY", path)
        };
        let loaded = load_bars(&opts).unwrap();
        assert_eq!(loaded.bars.len(), 2);
        assert_eq!(loaded.out_of_window, 1);
    }

    #[test]
    fn synthetic_data_is_deterministic() {
        let a = load_bars(&LoadOptions::synthetic("SPY")).unwrap();
        let b = load_bars(&LoadOptions::synthetic("SPY")).unwrap();
        assert_eq!(a.dataset_hash, b.dataset_hash);

        let other = load_bars(&LoadOptions::synthetic("QQQ")).unwrap();
        assert_ne!(a.dataset_hash, other.dataset_hash);
    }
}
