//! Per-view sort header state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Sort direction of a single column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Direction after clicking an already-active column.
    ///
    /// An unsorted column starts ascending.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Unsorted | Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison result.
    ///
    /// `Unsorted` maps everything to `Equal`, which keeps a stable sort a no-op.
    pub fn apply(self, ascending: Ordering) -> Ordering {
        match self {
            Self::Ascending => ascending,
            Self::Descending => ascending.reverse(),
            Self::Unsorted => Ordering::Equal,
        }
    }

    /// Header indicator glyph.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Which column a view is sorted by, and per-column directions.
///
/// At most one column is ever non-`Unsorted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    directions: Vec<SortDirection>,
    active: Option<usize>,
}

impl SortState {
    pub fn new(columns: usize) -> Self {
        Self {
            directions: vec![SortDirection::Unsorted; columns],
            active: None,
        }
    }

    /// Register a header click and return the column's new direction.
    ///
    /// Clicking the active column reverses it. Clicking another column resets
    /// the previous one to `Unsorted` and starts the new one ascending.
    /// Returns `None` (state unchanged) for an out-of-range column.
    pub fn click(&mut self, column: usize) -> Option<SortDirection> {
        if column >= self.directions.len() {
            return None;
        }
        let next = match self.active {
            Some(active) if active == column => self.directions[column].toggled(),
            Some(active) => {
                self.directions[active] = SortDirection::Unsorted;
                SortDirection::Ascending
            }
            None => SortDirection::Ascending,
        };
        self.directions[column] = next;
        self.active = Some(column);
        Some(next)
    }

    /// Record `column` as sorted in `direction` without a click sequence.
    ///
    /// `Unsorted` clears the state. Returns `false` (state unchanged) for an
    /// out-of-range column.
    pub fn set(&mut self, column: usize, direction: SortDirection) -> bool {
        if column >= self.directions.len() {
            return false;
        }
        self.reset();
        if direction != SortDirection::Unsorted {
            self.directions[column] = direction;
            self.active = Some(column);
        }
        true
    }

    pub fn direction(&self, column: usize) -> SortDirection {
        self.directions
            .get(column)
            .copied()
            .unwrap_or(SortDirection::Unsorted)
    }

    /// Active column and its direction, if any header has been clicked.
    pub fn active(&self) -> Option<(usize, SortDirection)> {
        self.active.map(|c| (c, self.directions[c]))
    }

    pub fn columns(&self) -> usize {
        self.directions.len()
    }

    /// Forget all header clicks.
    pub fn reset(&mut self) {
        self.directions.fill(SortDirection::Unsorted);
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_click_is_ascending() {
        let mut s = SortState::new(3);
        assert_eq!(s.click(1), Some(SortDirection::Ascending));
        assert_eq!(s.active(), Some((1, SortDirection::Ascending)));
    }

    #[test]
    fn same_column_toggles() {
        let mut s = SortState::new(3);
        s.click(2);
        assert_eq!(s.click(2), Some(SortDirection::Descending));
        assert_eq!(s.click(2), Some(SortDirection::Ascending));
    }

    #[test]
    fn other_column_resets_previous() {
        let mut s = SortState::new(3);
        s.click(0);
        s.click(0);
        assert_eq!(s.direction(0), SortDirection::Descending);
        assert_eq!(s.click(2), Some(SortDirection::Ascending));
        assert_eq!(s.direction(0), SortDirection::Unsorted);
        // Coming back starts ascending again, not from the old descending.
        assert_eq!(s.click(0), Some(SortDirection::Ascending));
        assert_eq!(s.direction(2), SortDirection::Unsorted);
    }

    #[test]
    fn out_of_range_click_is_ignored() {
        let mut s = SortState::new(2);
        s.click(1);
        assert_eq!(s.click(5), None);
        assert_eq!(s.active(), Some((1, SortDirection::Ascending)));
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = SortState::new(2);
        s.click(1);
        s.reset();
        assert_eq!(s.active(), None);
        assert_eq!(s.direction(1), SortDirection::Unsorted);
    }

    #[test]
    fn set_records_direction_directly() {
        let mut s = SortState::new(3);
        s.click(0);
        assert!(s.set(2, SortDirection::Descending));
        assert_eq!(s.active(), Some((2, SortDirection::Descending)));
        assert_eq!(s.direction(0), SortDirection::Unsorted);
        // The next click on the same column toggles from the recorded state.
        assert_eq!(s.click(2), Some(SortDirection::Ascending));

        assert!(!s.set(9, SortDirection::Ascending));
        assert!(s.set(2, SortDirection::Unsorted));
        assert_eq!(s.active(), None);
    }

    #[test]
    fn apply_orients_ordering() {
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Unsorted.apply(Ordering::Less), Ordering::Equal);
    }
}
