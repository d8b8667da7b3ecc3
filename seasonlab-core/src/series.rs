//! ReturnSeries construction — raw rows in, validated weekly bars out.
//!
//! Input order is preserved (callers hand over oldest-first data). Rows with
//! no date, a missing price, or a zero open are dropped rather than
//! zero-filled. There is no reordering and no deduplication by date.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::provider::RawBar;
use crate::domain::{SkipReason, WeeklyBar};

/// Bars plus an account of the rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub bars: Vec<WeeklyBar>,
    pub raw_count: usize,
    pub skipped: BTreeMap<String, usize>,
}

impl SeriesReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Convert raw rows into the ordered bar sequence.
pub fn build_series(raw: &[RawBar]) -> Vec<WeeklyBar> {
    raw.iter().filter_map(|row| to_bar(row).ok()).collect()
}

/// Like [`build_series`], but also counts dropped rows by reason.
pub fn build_series_with_report(raw: &[RawBar]) -> SeriesReport {
    let mut report = SeriesReport {
        bars: Vec::with_capacity(raw.len()),
        raw_count: raw.len(),
        skipped: BTreeMap::new(),
    };

    for (i, row) in raw.iter().enumerate() {
        match to_bar(row) {
            Ok(bar) => report.bars.push(bar),
            Err(reason) => {
                debug!(index = i, date = ?row.date, %reason, "dropping raw bar");
                *report.skipped.entry(reason.to_string()).or_insert(0) += 1;
            }
        }
    }
    report
}

fn to_bar(row: &RawBar) -> Result<WeeklyBar, SkipReason> {
    let date = row.date.ok_or(SkipReason::MissingDate)?;
    WeeklyBar::new(date, row.open, row.close)
}
