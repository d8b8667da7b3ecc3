//! Sorting rendered rows by re-parsing their cell text.
//!
//! A cell is reduced to the characters `0-9`, `-` and `.` and parsed as a
//! number. Two numeric cells compare numerically, so `"$2.50"` sorts before
//! `"$10.00"`. Two non-numeric cells compare as text. ISO dates fall in the
//! text group (`"2024-01-07"` strips to something that is not a number),
//! which sorts them correctly. In a mixed column every numeric cell sorts
//! before every text cell, so `"∞"` lands after all finite values.

use std::cmp::{Ordering, Reverse};

use super::state::SortDirection;

/// Numeric value of a display cell, if one can be recovered.
pub fn numeric_key(cell: &str) -> Option<f64> {
    let stripped: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    stripped.parse::<f64>().ok()
}

/// Sort key of a display cell, classified once.
///
/// Numbers order by `total_cmp`, text by [`locale_compare`], and numbers come
/// first.
#[derive(Debug, Clone)]
pub enum CellKey {
    Number(f64),
    Text(String),
}

impl CellKey {
    pub fn of(cell: &str) -> Self {
        match numeric_key(cell) {
            Some(v) => Self::Number(v),
            None => Self::Text(cell.to_string()),
        }
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => locale_compare(a, b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

/// Ascending comparison of two display cells.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    CellKey::of(a).cmp(&CellKey::of(b))
}

/// Case-insensitive comparison with an exact-text tie break.
///
/// Approximates a collation-aware string compare without locale data:
/// `"apple" < "Banana" < "cherry"`.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn cell<S: AsRef<str>>(row: &[S], column: usize) -> &str {
    row.get(column).map(|s| s.as_ref()).unwrap_or("")
}

/// Stable in-place sort of rows by one column.
///
/// Rows too short to have the column sort as if the cell were empty.
pub fn sort_rows<R, S>(rows: &mut [R], column: usize, direction: SortDirection)
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    match direction {
        SortDirection::Unsorted => {}
        SortDirection::Ascending => {
            rows.sort_by_cached_key(|r| CellKey::of(cell(r.as_ref(), column)))
        }
        SortDirection::Descending => {
            rows.sort_by_cached_key(|r| Reverse(CellKey::of(cell(r.as_ref(), column))))
        }
    }
}

/// New row order (indices into `rows`) without touching the rows.
pub fn row_order<R, S>(rows: &[R], column: usize, direction: SortDirection) -> Vec<usize>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut order: Vec<usize> = (0..rows.len()).collect();
    match direction {
        SortDirection::Unsorted => {}
        SortDirection::Ascending => {
            order.sort_by_cached_key(|&i| CellKey::of(cell(rows[i].as_ref(), column)))
        }
        SortDirection::Descending => {
            order.sort_by_cached_key(|&i| Reverse(CellKey::of(cell(rows[i].as_ref(), column))))
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(cells: &[&str]) -> Vec<Vec<String>> {
        cells.iter().map(|c| vec![c.to_string()]).collect()
    }

    fn firsts(rows: &[Vec<String>]) -> Vec<&str> {
        rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn currency_sorts_numerically() {
        let mut rows = column(&["$10.00", "$2.50", "$100.00"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(firsts(&rows), vec!["$2.50", "$10.00", "$100.00"]);
    }

    #[test]
    fn percentages_with_signs() {
        let mut rows = column(&["1.20%", "-3.40%", "0.00%", "-0.50%"]);
        sort_rows(&mut rows, 0, SortDirection::Descending);
        assert_eq!(firsts(&rows), vec!["1.20%", "0.00%", "-0.50%", "-3.40%"]);
    }

    #[test]
    fn iso_dates_fall_back_to_text() {
        assert_eq!(numeric_key("2024-01-07"), None);
        let mut rows = column(&["2024-03-01", "2023-12-25", "2024-01-07"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(firsts(&rows), vec!["2023-12-25", "2024-01-07", "2024-03-01"]);
    }

    #[test]
    fn infinity_symbol_is_not_numeric() {
        assert_eq!(numeric_key("∞"), None);
        assert_eq!(numeric_key("1.50"), Some(1.5));
    }

    #[test]
    fn stable_for_equal_keys() {
        let mut rows = vec![
            vec!["3".to_string(), "a".to_string()],
            vec!["1".to_string(), "b".to_string()],
            vec!["3".to_string(), "c".to_string()],
            vec!["1".to_string(), "d".to_string()],
        ];
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        let tags: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(tags, vec!["b", "d", "a", "c"]);

        sort_rows(&mut rows, 0, SortDirection::Descending);
        let tags: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(tags, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn labels_compare_case_insensitively() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Banana", "cherry"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Greater);
    }

    #[test]
    fn row_order_leaves_rows_alone() {
        let rows = column(&["$10.00", "$2.50", "$100.00"]);
        assert_eq!(row_order(&rows, 0, SortDirection::Ascending), vec![1, 0, 2]);
        assert_eq!(row_order(&rows, 0, SortDirection::Unsorted), vec![0, 1, 2]);
        assert_eq!(firsts(&rows), vec!["$10.00", "$2.50", "$100.00"]);
    }

    #[test]
    fn mixed_cells_order_is_transitive() {
        assert_eq!(compare_cells("9", "10"), Ordering::Less);
        assert_eq!(compare_cells("10", "2024-01-07"), Ordering::Less);
        assert_eq!(compare_cells("9", "2024-01-07"), Ordering::Less);
        assert_eq!(compare_cells("2024-01-07", "9"), Ordering::Greater);
    }

    #[test]
    fn mixed_numbers_and_dates_sort_without_panic() {
        let cells: Vec<String> = (0..200)
            .map(|i| {
                if i % 2 == 0 {
                    format!("{}", (i * 37) % 101)
                } else {
                    format!("{}-01-{:02}", 2000 + (i * 13) % 25, 1 + i % 28)
                }
            })
            .collect();
        let mut rows: Vec<Vec<String>> = cells.iter().map(|c| vec![c.clone()]).collect();

        sort_rows(&mut rows, 0, SortDirection::Ascending);
        let split = rows.iter().take_while(|r| numeric_key(&r[0]).is_some()).count();
        assert_eq!(split, 100);
        assert!(rows
            .windows(2)
            .all(|w| compare_cells(&w[0][0], &w[1][0]) != Ordering::Greater));

        sort_rows(&mut rows, 0, SortDirection::Descending);
        assert!(numeric_key(&rows[0][0]).is_none());
        assert!(rows
            .windows(2)
            .all(|w| compare_cells(&w[0][0], &w[1][0]) != Ordering::Less));
    }

    #[test]
    fn infinity_sorts_after_finite_values() {
        let mut rows = column(&["∞", "2.00", "0.50"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(firsts(&rows), vec!["0.50", "2.00", "∞"]);
    }

    #[test]
    fn missing_column_sorts_as_empty() {
        let mut rows = vec![vec!["b".to_string()], vec![], vec!["a".to_string()]];
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert!(rows[0].is_empty());
    }
}
