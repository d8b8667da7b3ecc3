//! Domain types for SeasonLab

pub mod bar;

pub use bar::{SkipReason, WeeklyBar};
