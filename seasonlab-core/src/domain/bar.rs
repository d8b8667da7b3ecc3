//! WeeklyBar — one weekly observation with its derived return and week key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::week_number;

/// A validated weekly bar.
///
/// Only constructed through [`WeeklyBar::new`], which rejects rows whose
/// return would be undefined. `week_number` and `weekly_return` are derived
/// once at construction and never change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub week_number: u32,
    pub weekly_return: f64,
}

/// Why a raw row did not become a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    MissingDate,
    MissingOpen,
    MissingClose,
    ZeroOpen,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingDate => "missing date",
            Self::MissingOpen => "missing open",
            Self::MissingClose => "missing close",
            Self::ZeroOpen => "zero open",
        };
        f.write_str(s)
    }
}

impl WeeklyBar {
    /// Build a bar from a UTC date and nullable prices.
    ///
    /// NaN and infinite prices count as missing.
    pub fn new(date: NaiveDate, open: Option<f64>, close: Option<f64>) -> Result<Self, SkipReason> {
        let open = open
            .filter(|v| v.is_finite())
            .ok_or(SkipReason::MissingOpen)?;
        let close = close
            .filter(|v| v.is_finite())
            .ok_or(SkipReason::MissingClose)?;
        if open == 0.0 {
            return Err(SkipReason::ZeroOpen);
        }
        Ok(Self {
            date,
            open,
            close,
            week_number: week_number(date),
            weekly_return: (close - open) / open,
        })
    }

    /// Strictly positive return.
    pub fn is_up(&self) -> bool {
        self.weekly_return > 0.0
    }

    /// Strictly negative return.
    pub fn is_down(&self) -> bool {
        self.weekly_return < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    #[test]
    fn computes_return_and_week() {
        let bar = WeeklyBar::new(date(), Some(100.0), Some(103.0)).unwrap();
        assert!((bar.weekly_return - 0.03).abs() < 1e-12);
        assert_eq!(bar.week_number, 2);
        assert!(bar.is_up());
        assert!(!bar.is_down());
    }

    #[test]
    fn rejects_missing_prices() {
        assert_eq!(
            WeeklyBar::new(date(), None, Some(1.0)),
            Err(SkipReason::MissingOpen)
        );
        assert_eq!(
            WeeklyBar::new(date(), Some(1.0), None),
            Err(SkipReason::MissingClose)
        );
        assert_eq!(
            WeeklyBar::new(date(), Some(f64::NAN), Some(1.0)),
            Err(SkipReason::MissingOpen)
        );
    }

    #[test]
    fn rejects_zero_open() {
        assert_eq!(
            WeeklyBar::new(date(), Some(0.0), Some(5.0)),
            Err(SkipReason::ZeroOpen)
        );
    }

    #[test]
    fn flat_week_is_neither_up_nor_down() {
        let bar = WeeklyBar::new(date(), Some(50.0), Some(50.0)).unwrap();
        assert_eq!(bar.weekly_return, 0.0);
        assert!(!bar.is_up());
        assert!(!bar.is_down());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = WeeklyBar::new(date(), Some(100.0), Some(98.0)).unwrap();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: WeeklyBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
