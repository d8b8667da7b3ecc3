//! Synthetic weekly bars for development and tests.
//!
//! A seeded random walk with an optional seasonal tilt: the expected return
//! of each bar is shifted by `seasonal_amplitude * sin(2π · week / 52)`, so
//! the seasonality table has something to find. Results built on synthetic
//! data are tagged as such by the runner.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::provider::{BarSource, DataError, DataSource, FetchResult, RawBar};
use crate::calendar::week_number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub start: NaiveDate,
    pub weeks: usize,
    pub seed: u64,
    pub start_price: f64,
    /// Mean weekly return.
    pub drift: f64,
    /// Half-width of the uniform weekly shock.
    pub volatility: f64,
    pub seasonal_amplitude: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2010, 1, 4).unwrap_or_default(),
            weeks: 52 * 15,
            seed: 42,
            start_price: 100.0,
            drift: 0.001,
            volatility: 0.03,
            seasonal_amplitude: 0.004,
        }
    }
}

/// Generate `config.weeks` consecutive weekly bars, oldest first.
///
/// Deterministic for a given symbol and config: the RNG seed mixes the
/// symbol's BLAKE3 hash with `config.seed`.
pub fn generate_weekly_bars(symbol: &str, config: &SyntheticConfig) -> Vec<RawBar> {
    let mut seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    for (b, s) in seed.iter_mut().zip(config.seed.to_le_bytes()) {
        *b ^= s;
    }
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity(config.weeks);
    let mut price = config.start_price;
    for i in 0..config.weeks {
        let date = config.start + Duration::weeks(i as i64);
        let phase = std::f64::consts::TAU * week_number(date) as f64 / 52.0;
        let shock = if config.volatility > 0.0 {
            rng.gen_range(-config.volatility..config.volatility)
        } else {
            0.0
        };
        let weekly_return = config.drift + config.seasonal_amplitude * phase.sin() + shock;

        let open = price;
        let close = (open * (1.0 + weekly_return)).max(0.01);
        bars.push(RawBar::new(date, Some(open), Some(close)));
        price = close;
    }
    bars
}

/// The generator as a [`BarSource`].
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    config: SyntheticConfig,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }
}

impl BarSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn load(&self, symbol: &str) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: generate_weekly_bars(symbol, &self.config),
            source: DataSource::Synthetic,
        })
    }
}
