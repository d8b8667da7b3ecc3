//! Display rows for the detail and summary views.
//!
//! Values are formatted once into text cells; a [`RenderedTable`] owns its
//! rows together with its own [`SortState`], so header clicks on one view
//! never disturb the other.

use serde::{Deserialize, Serialize};

use crate::aggregate::SummaryRow;
use crate::domain::WeeklyBar;
use crate::table::{sort_rows, DetailColumn, SortDirection, SortState, SummaryColumn};

/// Sign of a row's return, for colouring by whatever draws the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Flat,
}

impl Tone {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub cells: Vec<String>,
    pub tone: Tone,
}

impl AsRef<[String]> for RenderedRow {
    fn as_ref(&self) -> &[String] {
        &self.cells
    }
}

/// A formatted view plus its header sort state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RenderedRow>,
    sort: SortState,
}

impl RenderedTable {
    pub fn new(headers: Vec<String>, rows: Vec<RenderedRow>) -> Self {
        let sort = SortState::new(headers.len());
        Self {
            headers,
            rows,
            sort,
        }
    }

    /// Handle a header click: update the direction and re-order the rows.
    pub fn click_header(&mut self, column: usize) -> Option<SortDirection> {
        let direction = self.sort.click(column)?;
        sort_rows(&mut self.rows, column, direction);
        Some(direction)
    }

    /// Mark rows that were ordered elsewhere as sorted by `column`.
    ///
    /// Only the header state changes; rows stay as they are.
    pub fn mark_sorted(&mut self, column: usize, direction: SortDirection) -> bool {
        self.sort.set(column, direction)
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Headers with the active column's direction glyph appended.
    pub fn header_labels(&self) -> Vec<String> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| match self.sort.direction(i) {
                SortDirection::Unsorted => h.clone(),
                dir => format!("{h} {}", dir.indicator()),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain cell grid, header row excluded.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.cells.clone()).collect()
    }

    /// Fixed-width text layout with right-aligned cells.
    pub fn to_text(&self) -> String {
        let labels = self.header_labels();
        let mut widths: Vec<usize> = labels.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:>w$}", w = *w))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut out = line(labels.as_slice());
        out.push('\n');
        out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row.cells.as_slice()));
            out.push('\n');
        }
        out
    }
}

// ─── Cell formatters ────────────────────────────────────────────────

/// `$123.45`, with the sign in front of the symbol when negative.
pub fn fmt_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

/// Fraction as a percentage with `decimals` places: 0.1234 → `12.34%`.
pub fn fmt_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// Two decimals, or the `∞` literal for an unbounded ratio.
pub fn fmt_ratio(value: f64) -> String {
    if value == f64::INFINITY {
        "∞".to_string()
    } else if value == f64::NEG_INFINITY {
        "-∞".to_string()
    } else {
        format!("{value:.2}")
    }
}

// ─── Views ──────────────────────────────────────────────────────────

pub fn detail_row(bar: &WeeklyBar) -> RenderedRow {
    RenderedRow {
        cells: vec![
            bar.week_number.to_string(),
            bar.date.format("%Y-%m-%d").to_string(),
            fmt_currency(bar.open),
            fmt_currency(bar.close),
            fmt_percent(bar.weekly_return, 2),
        ],
        tone: Tone::of(bar.weekly_return),
    }
}

pub fn summary_row(row: &SummaryRow) -> RenderedRow {
    RenderedRow {
        cells: vec![
            row.week_number.to_string(),
            row.count.to_string(),
            fmt_percent(row.win_rate, 1),
            fmt_percent(row.avg_return, 2),
            fmt_ratio(row.profit_factor),
            fmt_ratio(row.sharpe_ratio),
            fmt_percent(row.std_dev, 2),
            fmt_percent(row.max_return, 2),
            fmt_percent(row.min_return, 2),
        ],
        tone: Tone::of(row.avg_return),
    }
}

/// Detail view of an oldest-first series, newest bar first.
pub fn detail_view(bars: &[WeeklyBar]) -> RenderedTable {
    RenderedTable::new(
        DetailColumn::ALL.iter().map(|c| c.header().to_string()).collect(),
        bars.iter().rev().map(detail_row).collect(),
    )
}

/// Summary view in the order given (ascending week from the aggregator).
pub fn summary_view(rows: &[SummaryRow]) -> RenderedTable {
    RenderedTable::new(
        SummaryColumn::ALL.iter().map(|c| c.header().to_string()).collect(),
        rows.iter().map(summary_row).collect(),
    )
}
