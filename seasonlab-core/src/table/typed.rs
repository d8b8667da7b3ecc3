//! Typed column sorting — order bars and summary rows on their fields.
//!
//! Column indices line up with the rendered views in [`crate::render`], so a
//! header click can drive either the text sorter or this one.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::SortDirection;
use crate::aggregate::SummaryRow;
use crate::domain::WeeklyBar;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {view} column '{name}'")]
pub struct ParseColumnError {
    pub view: &'static str,
    pub name: String,
}

/// Columns of the detail (one row per bar) view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailColumn {
    Week,
    Date,
    Open,
    Close,
    Return,
}

impl DetailColumn {
    pub const ALL: [DetailColumn; 5] = [
        Self::Week,
        Self::Date,
        Self::Open,
        Self::Close,
        Self::Return,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Date => "Date",
            Self::Open => "Open",
            Self::Close => "Close",
            Self::Return => "Return",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Ascending comparison of two bars on this column.
    pub fn compare(&self, a: &WeeklyBar, b: &WeeklyBar) -> Ordering {
        match self {
            Self::Week => a.week_number.cmp(&b.week_number),
            Self::Date => a.date.cmp(&b.date),
            Self::Open => a.open.total_cmp(&b.open),
            Self::Close => a.close.total_cmp(&b.close),
            Self::Return => a.weekly_return.total_cmp(&b.weekly_return),
        }
    }
}

impl fmt::Display for DetailColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for DetailColumn {
    type Err = ParseColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "date" => Ok(Self::Date),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "return" | "weekly_return" => Ok(Self::Return),
            _ => Err(ParseColumnError {
                view: "detail",
                name: s.to_string(),
            }),
        }
    }
}

/// Columns of the summary (one row per week-of-year) view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryColumn {
    Week,
    Count,
    WinRate,
    AvgReturn,
    ProfitFactor,
    Sharpe,
    StdDev,
    MaxReturn,
    MinReturn,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 9] = [
        Self::Week,
        Self::Count,
        Self::WinRate,
        Self::AvgReturn,
        Self::ProfitFactor,
        Self::Sharpe,
        Self::StdDev,
        Self::MaxReturn,
        Self::MinReturn,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::Week => "Week",
            Self::Count => "Count",
            Self::WinRate => "Win Rate",
            Self::AvgReturn => "Avg Return",
            Self::ProfitFactor => "Profit Factor",
            Self::Sharpe => "Sharpe",
            Self::StdDev => "Std Dev",
            Self::MaxReturn => "Max",
            Self::MinReturn => "Min",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Ascending comparison of two rows on this column.
    ///
    /// `f64::total_cmp` puts an infinite profit factor after every finite one.
    pub fn compare(&self, a: &SummaryRow, b: &SummaryRow) -> Ordering {
        match self {
            Self::Week => a.week_number.cmp(&b.week_number),
            Self::Count => a.count.cmp(&b.count),
            Self::WinRate => a.win_rate.total_cmp(&b.win_rate),
            Self::AvgReturn => a.avg_return.total_cmp(&b.avg_return),
            Self::ProfitFactor => a.profit_factor.total_cmp(&b.profit_factor),
            Self::Sharpe => a.sharpe_ratio.total_cmp(&b.sharpe_ratio),
            Self::StdDev => a.std_dev.total_cmp(&b.std_dev),
            Self::MaxReturn => a.max_return.total_cmp(&b.max_return),
            Self::MinReturn => a.min_return.total_cmp(&b.min_return),
        }
    }
}

impl fmt::Display for SummaryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for SummaryColumn {
    type Err = ParseColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "week" => Ok(Self::Week),
            "count" => Ok(Self::Count),
            "win_rate" => Ok(Self::WinRate),
            "avg_return" | "avg" => Ok(Self::AvgReturn),
            "profit_factor" | "pf" => Ok(Self::ProfitFactor),
            "sharpe" | "sharpe_ratio" => Ok(Self::Sharpe),
            "std_dev" | "stddev" => Ok(Self::StdDev),
            "max_return" | "max" => Ok(Self::MaxReturn),
            "min_return" | "min" => Ok(Self::MinReturn),
            _ => Err(ParseColumnError {
                view: "summary",
                name: s.to_string(),
            }),
        }
    }
}

/// Stable sort of bars by a typed column.
pub fn sort_bars(bars: &mut [WeeklyBar], column: DetailColumn, direction: SortDirection) {
    if direction == SortDirection::Unsorted {
        return;
    }
    bars.sort_by(|a, b| direction.apply(column.compare(a, b)));
}

/// Stable sort of summary rows by a typed column.
pub fn sort_summary(rows: &mut [SummaryRow], column: SummaryColumn, direction: SortDirection) {
    if direction == SortDirection::Unsorted {
        return;
    }
    rows.sort_by(|a, b| direction.apply(column.compare(a, b)));
}
