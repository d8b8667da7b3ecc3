//! Analysis runner — wires together loading, filtering, and aggregation.
//!
//! Entry points:
//! - `run_analysis()`: loads data per config, then analyzes one filter mode. Used by CLI.
//! - `analyze_loaded()`: takes pre-loaded data + a mode. No I/O.
//! - `run_all_modes()` / `compare_loaded()`: every filter mode side by side,
//!   evaluated in parallel.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use seasonlab_core::data::DataSource;
use seasonlab_core::domain::WeeklyBar;
use seasonlab_core::table::{sort_summary, SortDirection, SummaryColumn};
use seasonlab_core::{analyze, AnalysisStatus, FilterMode, SummaryRow};

use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::{load_bars, LoadError, LoadOptions, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Requested order of the summary rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySort {
    pub column: SummaryColumn,
    pub direction: SortDirection,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub symbol: String,
    pub filter: FilterMode,
    pub status: AnalysisStatus,
    pub source: DataSource,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    /// Date span of the analyzed (pre-filter) series.
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub raw_count: usize,
    pub bar_count: usize,
    pub filtered_count: usize,
    pub skipped: BTreeMap<String, usize>,
    #[serde(default)]
    pub out_of_window: usize,
    #[serde(default)]
    pub sort: Option<SummarySort>,
    /// One row per populated week, ascending unless `sort` says otherwise.
    pub summary: Vec<SummaryRow>,
    /// Bars that survived the filter, oldest first.
    pub bars: Vec<WeeklyBar>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl AnalysisResult {
    pub fn is_ready(&self) -> bool {
        self.status == AnalysisStatus::Ready
    }

    /// Human-readable outcome line.
    pub fn status_message(&self) -> &'static str {
        self.status.message()
    }

    /// Populated week with the highest average return.
    pub fn best_week(&self) -> Option<&SummaryRow> {
        self.summary
            .iter()
            .max_by(|a, b| a.avg_return.total_cmp(&b.avg_return))
    }

    /// Populated week with the lowest average return.
    pub fn worst_week(&self) -> Option<&SummaryRow> {
        self.summary
            .iter()
            .min_by(|a, b| a.avg_return.total_cmp(&b.avg_return))
    }

    /// Fraction of all filtered weeks that closed up.
    pub fn overall_win_rate(&self) -> Option<f64> {
        if self.filtered_count == 0 {
            return None;
        }
        let wins: usize = self.summary.iter().map(|r| r.wins).sum();
        Some(wins as f64 / self.filtered_count as f64)
    }
}

/// All filter modes over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeComparison {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    /// One result per mode, in `FilterMode::ALL_MODES` order.
    pub results: Vec<AnalysisResult>,
}

impl ModeComparison {
    pub fn get(&self, mode: FilterMode) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.filter == mode)
    }
}

/// Deterministic run identifier over the dataset and request.
pub fn run_id(dataset_hash: &str, mode: FilterMode, sort: Option<SummarySort>) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(dataset_hash.as_bytes());
    hasher.update(mode.as_str().as_bytes());
    if let Some(sort) = sort {
        hasher.update(sort.column.header().as_bytes());
        hasher.update(format!("{:?}", sort.direction).as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

fn sort_from_config(config: &AnalysisConfig) -> Option<SummarySort> {
    config.analysis.sort_by.map(|column| SummarySort {
        column,
        direction: match config.analysis.direction {
            SortDirection::Unsorted => SortDirection::Ascending,
            d => d,
        },
    })
}

/// Run one analysis from an `AnalysisConfig` (loads data first).
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisResult, RunError> {
    config.validate()?;
    let loaded = load_bars(&LoadOptions::from_config(config))?;
    Ok(analyze_loaded(
        &loaded,
        config.analysis.filter,
        sort_from_config(config),
    ))
}

/// Analyze pre-loaded data without touching the filesystem.
pub fn analyze_loaded(
    loaded: &LoadedData,
    mode: FilterMode,
    sort: Option<SummarySort>,
) -> AnalysisResult {
    let analysis = analyze(&loaded.bars, mode);
    let mut summary = analysis.summary;
    if let Some(s) = sort {
        sort_summary(&mut summary, s.column, s.direction);
    }

    info!(
        symbol = %loaded.symbol,
        filter = %mode,
        bars = loaded.bars.len(),
        kept = analysis.bars.len(),
        weeks = summary.len(),
        status = analysis.status.message(),
        "analysis complete"
    );

    AnalysisResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(&loaded.dataset_hash, mode, sort),
        symbol: loaded.symbol.clone(),
        filter: mode,
        status: analysis.status,
        source: loaded.source,
        dataset_hash: loaded.dataset_hash.clone(),
        has_synthetic: loaded.has_synthetic,
        first_date: loaded.bars.first().map(|b| b.date),
        last_date: loaded.bars.last().map(|b| b.date),
        raw_count: loaded.raw_count,
        bar_count: loaded.bars.len(),
        filtered_count: analysis.bars.len(),
        skipped: loaded.skipped.clone(),
        out_of_window: loaded.out_of_window,
        sort,
        summary,
        bars: analysis.bars,
    }
}

/// Load once, then analyze every filter mode.
pub fn run_all_modes(config: &AnalysisConfig) -> Result<ModeComparison, RunError> {
    config.validate()?;
    let loaded = load_bars(&LoadOptions::from_config(config))?;
    Ok(compare_loaded(&loaded, sort_from_config(config)))
}

/// Analyze every filter mode over pre-loaded data, in parallel.
pub fn compare_loaded(loaded: &LoadedData, sort: Option<SummarySort>) -> ModeComparison {
    let results: Vec<AnalysisResult> = FilterMode::ALL_MODES
        .par_iter()
        .map(|&mode| analyze_loaded(loaded, mode, sort))
        .collect();

    ModeComparison {
        schema_version: SCHEMA_VERSION,
        symbol: loaded.symbol.clone(),
        dataset_hash: loaded.dataset_hash.clone(),
        has_synthetic: loaded.has_synthetic,
        results,
    }
}
