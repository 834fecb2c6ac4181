//! Which input moves the block reward the most

use serde::{Deserialize, Serialize};

use crate::params::EconomicsParams;
use crate::scenario::{compute_issuance, NetworkSnapshot, ScenarioInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityDriver {
    TransactionVolume,
    UniqueMiners,
    BlockHeight,
}

impl SensitivityDriver {
    pub const ALL: [SensitivityDriver; 3] = [
        SensitivityDriver::TransactionVolume,
        SensitivityDriver::UniqueMiners,
        SensitivityDriver::BlockHeight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SensitivityDriver::TransactionVolume => "transaction volume",
            SensitivityDriver::UniqueMiners => "unique miners",
            SensitivityDriver::BlockHeight => "block height",
        }
    }

    fn scaled(&self, network: &NetworkSnapshot, factor: f64) -> NetworkSnapshot {
        let mut out = *network;
        match self {
            SensitivityDriver::TransactionVolume => out.transaction_volume_ratio *= factor,
            SensitivityDriver::UniqueMiners => {
                out.unique_miner_count = (out.unique_miner_count as f64 * factor).round() as u64
            }
            SensitivityDriver::BlockHeight => {
                out.block_height = (out.block_height as f64 * factor).round() as u64
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub driver: SensitivityDriver,
    /// Reward with the driver lowered by `step_pct`
    pub reward_low: f64,
    /// Reward with the driver raised by `step_pct`
    pub reward_high: f64,
    /// `reward_high - reward_low`
    pub swing: f64,
}

/// Perturb each driver by `step_pct` percent both ways and rank by |swing|.
pub fn reward_sensitivity(
    inputs: &ScenarioInputs,
    params: &EconomicsParams,
    step_pct: f64,
) -> Vec<SensitivityEntry> {
    let step = step_pct.abs() / 100.0;

    let mut entries: Vec<SensitivityEntry> = SensitivityDriver::ALL
        .iter()
        .map(|driver| {
            let low = driver.scaled(&inputs.network, (1.0 - step).max(0.0));
            let high = driver.scaled(&inputs.network, 1.0 + step);
            let reward_low = compute_issuance(&low, params).reward_per_block;
            let reward_high = compute_issuance(&high, params).reward_per_block;
            SensitivityEntry {
                driver: *driver,
                reward_low,
                reward_high,
                swing: reward_high - reward_low,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.swing.abs().total_cmp(&a.swing.abs()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> ScenarioInputs {
        ScenarioInputs::from(NetworkSnapshot {
            transaction_volume_ratio: 1.0,
            unique_miner_count: 250,
            block_height: 10,
            block_time_ms: 1000.0,
            mempool_fullness_pct: 0.0,
            issued_supply: 1_000.0,
        })
    }

    #[test]
    fn test_one_entry_per_driver_sorted() {
        let entries = reward_sensitivity(&inputs(), &EconomicsParams::default(), 10.0);
        assert_eq!(entries.len(), 3);
        for pair in entries.windows(2) {
            assert!(pair[0].swing.abs() >= pair[1].swing.abs());
        }
    }

    #[test]
    fn test_height_far_from_halving_has_no_swing() {
        let entries = reward_sensitivity(&inputs(), &EconomicsParams::default(), 10.0);
        let height = entries
            .iter()
            .find(|e| e.driver == SensitivityDriver::BlockHeight)
            .unwrap();
        assert_eq!(height.swing, 0.0);
        assert_eq!(entries.last().unwrap().driver, SensitivityDriver::BlockHeight);
    }

    #[test]
    fn test_volume_swing_positive() {
        let entries = reward_sensitivity(&inputs(), &EconomicsParams::default(), 20.0);
        let volume = entries
            .iter()
            .find(|e| e.driver == SensitivityDriver::TransactionVolume)
            .unwrap();
        assert!(volume.swing > 0.0);
        assert!(volume.reward_high > volume.reward_low);
    }
}
