//! Named scenario presets
//!
//! A preset is a fixed transform of the live snapshot. Block height is never
//! touched: it is a fact about the chain, not a scenario knob.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EconomicsError;
use crate::scenario::{NetworkSnapshot, ScenarioInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Live snapshot unchanged
    Live,
    /// Thin bootstrap network
    Early,
    Growth,
    Mainnet,
    /// Congested network: heavy volume, slow blocks, full mempool
    Stress,
    /// Volume spike with faster blocks
    Surge,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Live,
        Preset::Early,
        Preset::Growth,
        Preset::Mainnet,
        Preset::Stress,
        Preset::Surge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Live => "live",
            Preset::Early => "early",
            Preset::Growth => "growth",
            Preset::Mainnet => "mainnet",
            Preset::Stress => "stress",
            Preset::Surge => "surge",
        }
    }

    pub fn apply(&self, live: &NetworkSnapshot) -> ScenarioInputs {
        let mut inputs = ScenarioInputs::from(*live);
        let net = &mut inputs.network;

        match self {
            Preset::Live => {}
            Preset::Early => {
                net.transaction_volume_ratio *= 0.6;
                net.unique_miner_count = scale_count(net.unique_miner_count, 0.3);
            }
            Preset::Growth => {
                net.transaction_volume_ratio *= 1.5;
                net.unique_miner_count = scale_count(net.unique_miner_count, 1.5);
            }
            Preset::Mainnet => {
                net.transaction_volume_ratio *= 1.2;
                net.unique_miner_count = scale_count(net.unique_miner_count, 3.0);
            }
            Preset::Stress => {
                net.transaction_volume_ratio *= 2.0;
                net.block_time_ms *= 1.5;
                net.mempool_fullness_pct = 95.0;
                inputs.readiness_boost_pct = -10.0;
            }
            Preset::Surge => {
                net.transaction_volume_ratio *= 2.5;
                net.block_time_ms *= 0.7;
            }
        }

        inputs.clamped()
    }
}

/// Scale a miner count, keeping at least one miner when there was one.
fn scale_count(count: u64, factor: f64) -> u64 {
    if count == 0 {
        return 0;
    }
    ((count as f64 * factor).round() as u64).max(1)
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = EconomicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| EconomicsError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> NetworkSnapshot {
        NetworkSnapshot {
            transaction_volume_ratio: 1.0,
            unique_miner_count: 40,
            block_height: 2_500_000,
            block_time_ms: 1000.0,
            mempool_fullness_pct: 30.0,
            issued_supply: 9_000_000.0,
        }
    }

    #[test]
    fn test_live_is_identity() {
        let inputs = Preset::Live.apply(&live());
        assert_eq!(inputs.network, live());
        assert_eq!(inputs.readiness_boost_pct, 0.0);
    }

    #[test]
    fn test_surge() {
        let inputs = Preset::Surge.apply(&live());
        assert_eq!(inputs.network.transaction_volume_ratio, 2.5);
        assert!((inputs.network.block_time_ms - 700.0).abs() < 1e-9);
        assert_eq!(inputs.network.unique_miner_count, 40);
    }

    #[test]
    fn test_stress_stays_in_domain() {
        let mut snapshot = live();
        snapshot.mempool_fullness_pct = 99.0;
        let inputs = Preset::Stress.apply(&snapshot);
        assert_eq!(inputs.network.mempool_fullness_pct, 95.0);
        assert_eq!(inputs.readiness_boost_pct, -10.0);
        assert_eq!(inputs.network.block_time_ms, 1500.0);
    }

    #[test]
    fn test_presets_never_move_height() {
        for preset in Preset::ALL {
            assert_eq!(preset.apply(&live()).network.block_height, 2_500_000, "{}", preset);
        }
    }

    #[test]
    fn test_early_keeps_a_miner() {
        let mut snapshot = live();
        snapshot.unique_miner_count = 1;
        assert_eq!(Preset::Early.apply(&snapshot).network.unique_miner_count, 1);
        snapshot.unique_miner_count = 0;
        assert_eq!(Preset::Early.apply(&snapshot).network.unique_miner_count, 0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("SURGE".parse::<Preset>().unwrap(), Preset::Surge);
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!(
            "panic".parse::<Preset>(),
            Err(EconomicsError::UnknownPreset("panic".to_string()))
        );
    }
}
