//! Table sorting for the detail and summary views.
//!
//! Two ways to order rows:
//! - [`text`]: re-derive a comparable value from already-rendered cell text
//!   (currency, percentages, counts, ISO dates, labels).
//! - [`typed`]: sort bars and summary rows directly on their typed fields.
//!
//! [`SortState`] is the per-view header state (which column is active, in
//! which direction). Each view owns its own instance.

pub mod state;
pub mod text;
pub mod typed;

pub use state::{SortDirection, SortState};
pub use text::{compare_cells, locale_compare, numeric_key, row_order, sort_rows, CellKey};
pub use typed::{sort_bars, sort_summary, DetailColumn, ParseColumnError, SummaryColumn};
