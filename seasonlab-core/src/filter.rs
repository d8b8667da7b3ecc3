//! Conditional filter — select bars by the sign of the preceding bar's return.
//!
//! The predecessor is looked up by *sequence position*, not by week number,
//! so this must run on the chronologically ordered series before anything
//! re-sorts it for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::WeeklyBar;

/// Which bars survive the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Every bar, including the first.
    #[default]
    All,
    /// Bars whose previous bar closed up (return > 0).
    AfterUp,
    /// Bars whose previous bar closed down (return < 0).
    AfterDown,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 3] = [Self::All, Self::AfterUp, Self::AfterDown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::AfterUp => "after-up",
            Self::AfterDown => "after-down",
        }
    }

    /// Short human label for report headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All weeks",
            Self::AfterUp => "After an up week",
            Self::AfterDown => "After a down week",
        }
    }

    fn admits(&self, previous: &WeeklyBar) -> bool {
        match self {
            Self::All => true,
            Self::AfterUp => previous.is_up(),
            Self::AfterDown => previous.is_down(),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown filter mode '{0}' (expected all, after-up or after-down)")]
pub struct ParseFilterModeError(pub String);

impl FromStr for FilterMode {
    type Err = ParseFilterModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "all" => Ok(Self::All),
            "after-up" | "up" => Ok(Self::AfterUp),
            "after-down" | "down" => Ok(Self::AfterDown),
            _ => Err(ParseFilterModeError(s.to_string())),
        }
    }
}

/// Apply the filter, preserving the relative order of surviving bars.
///
/// `All` returns the input unchanged. The conditional modes never include
/// index 0, and a previous return of exactly zero admits nothing.
pub fn apply_filter(bars: &[WeeklyBar], mode: FilterMode) -> Vec<WeeklyBar> {
    if mode == FilterMode::All {
        return bars.to_vec();
    }
    bars.windows(2)
        .filter(|pair| mode.admits(&pair[0]))
        .map(|pair| pair[1])
        .collect()
}
