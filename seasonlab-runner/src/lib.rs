//! SeasonLab Runner — analysis orchestration, comparison, and export.
//!
//! This crate builds on `seasonlab-core` to provide:
//! - TOML analysis configuration with validation
//! - Data loading from CSV / chart JSON with synthetic fallback
//! - Single-mode runs and all-modes comparison (parallel)
//! - JSON, CSV and Markdown artifacts with schema versioning

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{AnalysisConfig, ConfigError, InputFormat};
pub use data_loader::{load_bars, LoadError, LoadOptions, LoadedData};
pub use export::{
    export_json, generate_comparison, generate_report, import_json, load_artifacts,
    save_artifacts, save_comparison,
};
pub use runner::{
    analyze_loaded, compare_loaded, run_all_modes, run_analysis, AnalysisResult, ModeComparison,
    RunError, SummarySort, SCHEMA_VERSION,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn analysis_result_is_send_sync() {
        assert_send::<AnalysisResult>();
        assert_sync::<AnalysisResult>();
    }

    #[test]
    fn mode_comparison_is_send_sync() {
        assert_send::<ModeComparison>();
        assert_sync::<ModeComparison>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }

    #[test]
    fn loaded_data_is_send_sync() {
        assert_send::<LoadedData>();
        assert_sync::<LoadedData>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
    }
}
