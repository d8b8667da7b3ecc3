//! Seasonal aggregator — per-week-of-year return statistics.
//!
//! Bars are grouped by `week_number`; each populated group yields one
//! [`SummaryRow`]. Weeks with no members are omitted, not zero-filled.
//! Every metric is a pure function of the group's return slice.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::WeeklyBar;

/// Weekly periods per year used to annualize the Sharpe ratio.
pub const PERIODS_PER_YEAR: f64 = 52.0;

/// Standard deviations at or below this fraction of `|mean|` are rounding
/// residue of a constant group and count as zero volatility.
const ZERO_VOL_RELATIVE: f64 = 1e-12;

/// Statistics for one week-of-year slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub week_number: u32,
    pub count: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_return: f64,
    /// `+∞` when the group has no losing weeks.
    #[serde(with = "crate::serde_float")]
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
    pub std_dev: f64,
    pub max_return: f64,
    pub min_return: f64,
}

impl SummaryRow {
    /// Compute the row for a non-empty group of returns.
    ///
    /// Returns `None` for an empty slice; the aggregator never produces one.
    pub fn from_returns(week_number: u32, returns: &[f64]) -> Option<Self> {
        if returns.is_empty() {
            return None;
        }
        let wins = returns.iter().filter(|&&r| r > 0.0).count();
        let max_return = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_return = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let std = std_dev(returns);
        Some(Self {
            week_number,
            count: returns.len(),
            wins,
            win_rate: wins as f64 / returns.len() as f64,
            // Rounding can push the mean of identical values one ulp outside them.
            avg_return: mean(returns).clamp(min_return, max_return),
            profit_factor: profit_factor(returns),
            sharpe_ratio: sharpe_ratio(returns),
            std_dev: std,
            max_return,
            min_return,
        })
    }

    /// True when the group had no losing weeks.
    pub fn has_infinite_profit_factor(&self) -> bool {
        self.profit_factor == f64::INFINITY
    }
}

/// Group bars by week number and compute one row per populated week.
///
/// The map iterates in ascending week order, which is the display order.
pub fn aggregate(bars: &[WeeklyBar]) -> BTreeMap<u32, SummaryRow> {
    group_returns(bars)
        .into_iter()
        .filter_map(|(week, returns)| SummaryRow::from_returns(week, &returns).map(|r| (week, r)))
        .collect()
}

/// [`aggregate`] flattened into ascending week order.
pub fn summary_rows(bars: &[WeeklyBar]) -> Vec<SummaryRow> {
    aggregate(bars).into_values().collect()
}

/// The ephemeral week groups: week number → returns in input order.
pub fn group_returns(bars: &[WeeklyBar]) -> BTreeMap<u32, Vec<f64>> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for bar in bars {
        groups
            .entry(bar.week_number)
            .or_default()
            .push(bar.weekly_return);
    }
    groups
}

// ─── Individual metric functions ────────────────────────────────────

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    returns.iter().sum::<f64>() / returns.len() as f64
}

/// Population standard deviation (divides by n, not n − 1).
pub fn std_dev(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let m = mean(returns);
    let var = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / returns.len() as f64;
    var.sqrt()
}

/// Gross gains over gross absolute losses.
///
/// `+∞` whenever losses sum to zero, including the all-flat group where gains
/// are zero too.
pub fn profit_factor(returns: &[f64]) -> f64 {
    let gains: f64 = returns.iter().filter(|&&r| r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|&&r| r < 0.0).sum::<f64>().abs();
    if losses == 0.0 {
        return f64::INFINITY;
    }
    gains / losses
}

/// Annualized Sharpe ratio with zero risk-free rate.
///
/// Sharpe = mean / std * sqrt(52). Returns 0.0 when volatility is zero.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let m = mean(returns);
    let std = std_dev(returns);
    if std == 0.0 || std <= ZERO_VOL_RELATIVE * m.abs() {
        return 0.0;
    }
    (m / std) * PERIODS_PER_YEAR.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar_in_week(week: u32, year: i32, ret: f64) -> WeeklyBar {
        let date = NaiveDate::from_yo_opt(year, (week - 1) * 7 + 1).unwrap();
        let bar = WeeklyBar::new(date, Some(100.0), Some(100.0 * (1.0 + ret))).unwrap();
        WeeklyBar {
            weekly_return: ret,
            ..bar
        }
    }

    #[test]
    fn two_week_scenario() {
        let bars = vec![
            bar_in_week(1, 2020, 0.02),
            bar_in_week(1, 2021, -0.01),
            bar_in_week(2, 2020, 0.03),
            bar_in_week(2, 2021, -0.02),
        ];
        let table = aggregate(&bars);
        assert_eq!(table.len(), 2);

        let w1 = table[&1];
        assert_eq!(w1.count, 2);
        assert_eq!(w1.wins, 1);
        assert!((w1.win_rate - 0.5).abs() < 1e-12);
        assert!((w1.avg_return - 0.005).abs() < 1e-12);
        assert!((w1.profit_factor - 2.0).abs() < 1e-12);

        let w2 = table[&2];
        assert_eq!(w2.count, 2);
        assert!((w2.win_rate - 0.5).abs() < 1e-12);
        assert!((w2.avg_return - 0.005).abs() < 1e-12);
        assert!((w2.profit_factor - 1.5).abs() < 1e-12);
        assert!((w2.max_return - 0.03).abs() < 1e-12);
        assert!((w2.min_return + 0.02).abs() < 1e-12);
    }

    #[test]
    fn no_losses_gives_infinite_profit_factor() {
        let row = SummaryRow::from_returns(10, &[0.01, 0.02]).unwrap();
        assert!(row.has_infinite_profit_factor());
        assert!(row.std_dev > 0.0);
        // mean 0.015, std 0.005 → 3 * sqrt(52)
        assert!((row.sharpe_ratio - 3.0 * 52f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn all_flat_group_is_infinite_not_nan() {
        let row = SummaryRow::from_returns(4, &[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(row.profit_factor, f64::INFINITY);
        assert_eq!(row.sharpe_ratio, 0.0);
        assert_eq!(row.win_rate, 0.0);
        assert_eq!(row.std_dev, 0.0);
    }

    #[test]
    fn all_losses_gives_zero_profit_factor() {
        let row = SummaryRow::from_returns(4, &[-0.01, -0.03]).unwrap();
        assert_eq!(row.profit_factor, 0.0);
        assert!(row.sharpe_ratio < 0.0);
    }

    #[test]
    fn constant_group_has_zero_sharpe() {
        let row = SummaryRow::from_returns(7, &[0.1, 0.1, 0.1]).unwrap();
        assert_eq!(row.sharpe_ratio, 0.0);
        assert!(row.min_return <= row.avg_return && row.avg_return <= row.max_return);
    }

    #[test]
    fn tiny_real_spread_keeps_sharpe() {
        let returns = [1e-16, -1e-16, 3e-16];
        assert!(std_dev(&returns) > 0.0);
        let expected = mean(&returns) / std_dev(&returns) * 52f64.sqrt();
        assert!((sharpe_ratio(&returns) - expected).abs() < 1e-9);
        assert!(sharpe_ratio(&returns) > 0.0);
    }

    #[test]
    fn rounding_residue_counts_as_zero_volatility() {
        let returns = [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];
        assert_eq!(sharpe_ratio(&returns), 0.0);
    }

    #[test]
    fn std_dev_is_population() {
        // Population variance of [1, 3] is 1; sample variance would be 2.
        assert!((std_dev(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_groups_are_omitted() {
        let bars = vec![bar_in_week(3, 2020, 0.01), bar_in_week(50, 2020, -0.01)];
        let weeks: Vec<u32> = aggregate(&bars).keys().copied().collect();
        assert_eq!(weeks, vec![3, 50]);
        assert!(aggregate(&[]).is_empty());
        assert!(SummaryRow::from_returns(1, &[]).is_none());
    }

    #[test]
    fn summary_rows_ascend() {
        let bars = vec![
            bar_in_week(9, 2020, 0.01),
            bar_in_week(2, 2020, 0.01),
            bar_in_week(5, 2020, 0.01),
        ];
        let weeks: Vec<u32> = summary_rows(&bars).iter().map(|r| r.week_number).collect();
        assert_eq!(weeks, vec![2, 5, 9]);
    }

    #[test]
    fn infinite_profit_factor_survives_json() {
        let row = SummaryRow::from_returns(1, &[0.01]).unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"profit_factor\":\"inf\""));
        let back: SummaryRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.profit_factor, f64::INFINITY);
    }
}
