//! Live-vs-scenario issuance comparison
//!
//! A [`NetworkSnapshot`] is what the chain reports right now. [`ScenarioInputs`]
//! is the user's edited copy of it. Both run through the same formulas and the
//! result is diffed element-wise.

use serde::{Deserialize, Serialize};

use crate::issuance::{calculate_issuance, halving_decay, halvings};
use crate::multipliers::{activity_from_volume, decentralization_from_miners};
use crate::params::EconomicsParams;
use crate::projection::{annual_issuance_from_reward, years_to_cap};

/// Network observables captured once per refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Transaction volume relative to the trailing baseline
    pub transaction_volume_ratio: f64,
    pub unique_miner_count: u64,
    pub block_height: u64,
    pub block_time_ms: f64,
    /// 0-100
    pub mempool_fullness_pct: f64,
    /// BLOCK emitted so far
    pub issued_supply: f64,
}

impl Default for NetworkSnapshot {
    fn default() -> Self {
        Self {
            transaction_volume_ratio: 1.0,
            unique_miner_count: 0,
            block_height: 0,
            block_time_ms: 1000.0,
            mempool_fullness_pct: 0.0,
            issued_supply: 0.0,
        }
    }
}

/// A snapshot the user is free to edit, plus the gate readiness boost.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioInputs {
    pub network: NetworkSnapshot,
    /// -100..=100 percentage points added to every gate's readiness
    pub readiness_boost_pct: f64,
}

impl From<NetworkSnapshot> for ScenarioInputs {
    fn from(network: NetworkSnapshot) -> Self {
        Self {
            network,
            readiness_boost_pct: 0.0,
        }
    }
}

impl ScenarioInputs {
    /// Pull every field back into its documented domain.
    pub fn clamped(mut self) -> Self {
        let net = &mut self.network;
        if net.transaction_volume_ratio <= 0.0 {
            net.transaction_volume_ratio = f64::MIN_POSITIVE;
        }
        if net.block_time_ms <= 0.0 {
            net.block_time_ms = f64::MIN_POSITIVE;
        }
        net.mempool_fullness_pct = net.mempool_fullness_pct.clamp(0.0, 100.0);
        net.issued_supply = net.issued_supply.max(0.0);
        self.readiness_boost_pct = self.readiness_boost_pct.clamp(-100.0, 100.0);
        self
    }
}

/// Full issuance picture for one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssuanceResult {
    pub reward_per_block: f64,
    pub activity_multiplier: f64,
    pub decentralization_multiplier: f64,
    pub halving_decay: f64,
    pub annual_issuance: f64,
    pub inflation_pct: f64,
    /// `f64::INFINITY` when annual issuance is zero
    #[serde(with = "crate::unbounded")]
    pub years_to_cap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDeltas {
    pub reward: f64,
    pub inflation_pct: f64,
    #[serde(with = "crate::unbounded")]
    pub years_to_cap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario: IssuanceResult,
    pub baseline: IssuanceResult,
    pub deltas: ScenarioDeltas,
}

impl ScenarioComparison {
    pub fn new(scenario: IssuanceResult, baseline: IssuanceResult) -> Self {
        Self {
            deltas: ScenarioDeltas {
                reward: delta(scenario.reward_per_block, baseline.reward_per_block),
                inflation_pct: delta(scenario.inflation_pct, baseline.inflation_pct),
                years_to_cap: delta(scenario.years_to_cap, baseline.years_to_cap),
            },
            scenario,
            baseline,
        }
    }
}

/// `a - b`, except two equal infinities differ by zero instead of NaN.
fn delta(a: f64, b: f64) -> f64 {
    if a == b {
        0.0
    } else {
        a - b
    }
}

/// Run the whole formula chain for one snapshot.
pub fn compute_issuance(network: &NetworkSnapshot, params: &EconomicsParams) -> IssuanceResult {
    let activity_multiplier = activity_from_volume(network.transaction_volume_ratio);
    let decentralization_multiplier = decentralization_from_miners(network.unique_miner_count);

    let reward_per_block = calculate_issuance(
        params.base_reward,
        activity_multiplier,
        decentralization_multiplier,
        network.block_height,
        params.halving_interval,
    );
    let annual_issuance = annual_issuance_from_reward(reward_per_block, network.block_time_ms);

    let inflation_pct = if network.issued_supply > 0.0 {
        annual_issuance / network.issued_supply * 100.0
    } else {
        0.0
    };

    IssuanceResult {
        reward_per_block,
        activity_multiplier,
        decentralization_multiplier,
        halving_decay: halving_decay(halvings(network.block_height, params.halving_interval)),
        annual_issuance,
        inflation_pct,
        years_to_cap: years_to_cap(network.issued_supply, annual_issuance, params.max_supply),
    }
}

/// Compare the edited scenario against the live snapshot.
pub fn compute_scenario(
    inputs: &ScenarioInputs,
    live: &NetworkSnapshot,
    params: &EconomicsParams,
) -> ScenarioComparison {
    ScenarioComparison::new(
        compute_issuance(&inputs.network, params),
        compute_issuance(live, params),
    )
}
