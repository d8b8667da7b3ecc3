//! Dataset fingerprinting.

use crate::domain::WeeklyBar;

/// Deterministic BLAKE3 hash over the analyzed series.
///
/// Covers every bar's date, open and close in sequence order, so two runs
/// share a hash exactly when they analyzed the same bars in the same order.
pub fn dataset_hash(bars: &[WeeklyBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
