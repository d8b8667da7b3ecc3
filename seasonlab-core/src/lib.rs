//! SeasonLab Core — weekly bars, week-of-year keys, seasonal statistics.
//!
//! This crate contains the analysis engine:
//! - Domain types (weekly bars with derived return and week number)
//! - Simple (non-ISO) week-of-year numbering in UTC
//! - Return series construction from nullable raw rows
//! - Conditional filter on the previous week's return sign
//! - Per-week-of-year aggregation (win rate, mean, volatility, profit factor, Sharpe)
//! - Text and typed table sorting with per-view header state
//! - Detail and summary view rendering
//! - CSV / chart-JSON import and seeded synthetic data

pub mod aggregate;
pub mod calendar;
pub mod data;
pub mod domain;
pub mod filter;
pub mod pipeline;
pub mod render;
pub mod serde_float;
pub mod series;
pub mod table;

pub use aggregate::{aggregate, summary_rows, SummaryRow};
pub use calendar::week_number;
pub use domain::WeeklyBar;
pub use filter::{apply_filter, FilterMode};
pub use pipeline::{analyze, AnalysisStatus, SeasonalAnalysis};
pub use series::{build_series, build_series_with_report, SeriesReport};
