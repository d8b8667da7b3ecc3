//! Filter → aggregate as one pure call.
//!
//! The dataset and filter mode are explicit arguments and every call returns
//! a fresh result. An empty dataset and a dataset the filter emptied are
//! reported as distinct statuses, not errors.

use serde::{Deserialize, Serialize};

use crate::aggregate::{summary_rows, SummaryRow};
use crate::domain::WeeklyBar;
use crate::filter::{apply_filter, FilterMode};

/// How far the pipeline got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Statistics were computed.
    Ready,
    /// No bars to analyze at all.
    EmptyInput,
    /// Bars existed but none survived the filter.
    EmptyAfterFilter,
}

impl AnalysisStatus {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Ready => "ok",
            Self::EmptyInput => "no data to analyze",
            Self::EmptyAfterFilter => "no weeks match the selected filter",
        }
    }
}

/// Output of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAnalysis {
    pub mode: FilterMode,
    pub status: AnalysisStatus,
    pub input_count: usize,
    /// Surviving bars, oldest first.
    pub bars: Vec<WeeklyBar>,
    /// One row per populated week, ascending.
    pub summary: Vec<SummaryRow>,
}

impl SeasonalAnalysis {
    pub fn is_ready(&self) -> bool {
        self.status == AnalysisStatus::Ready
    }

    pub fn filtered_count(&self) -> usize {
        self.bars.len()
    }

    /// Summary row for one week, if that week was populated.
    pub fn week(&self, week_number: u32) -> Option<&SummaryRow> {
        self.summary.iter().find(|r| r.week_number == week_number)
    }
}

/// Run the filter and aggregation for one mode.
pub fn analyze(bars: &[WeeklyBar], mode: FilterMode) -> SeasonalAnalysis {
    if bars.is_empty() {
        return SeasonalAnalysis {
            mode,
            status: AnalysisStatus::EmptyInput,
            input_count: 0,
            bars: Vec::new(),
            summary: Vec::new(),
        };
    }

    let filtered = apply_filter(bars, mode);
    let status = if filtered.is_empty() {
        AnalysisStatus::EmptyAfterFilter
    } else {
        AnalysisStatus::Ready
    };
    let summary = summary_rows(&filtered);

    SeasonalAnalysis {
        mode,
        status,
        input_count: bars.len(),
        bars: filtered,
        summary,
    }
}
