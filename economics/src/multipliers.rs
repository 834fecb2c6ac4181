//! Multipliers derived from raw network observables

use crate::constants::{ACTIVITY_MAX, ACTIVITY_MIN, DECENTRALIZATION_MAX, DECENTRALIZATION_MIN};

/// Activity multiplier from the transaction-volume ratio (current / baseline).
///
/// Log scaling tracks relative shifts in volume:
/// ```text
/// activity = clamp(1.0 + log2(ratio) * 0.3, 0.5, 2.0)
/// ```
/// Non-positive ratios map to the floor.
pub fn activity_from_volume(volume_ratio: f64) -> f64 {
    if volume_ratio <= 0.0 {
        return ACTIVITY_MIN;
    }
    (1.0 + volume_ratio.log2() * 0.3).clamp(ACTIVITY_MIN, ACTIVITY_MAX)
}

/// Decentralization multiplier from the unique-miner count.
///
/// ```text
/// decentralization = clamp(0.8 + sqrt(miners / 1000) * 0.4, 0.8, 1.5)
/// ```
pub fn decentralization_from_miners(miner_count: u64) -> f64 {
    if miner_count == 0 {
        return DECENTRALIZATION_MIN;
    }
    let scaled = (miner_count as f64 / 1000.0).sqrt();
    (DECENTRALIZATION_MIN + scaled * 0.4).clamp(DECENTRALIZATION_MIN, DECENTRALIZATION_MAX)
}
