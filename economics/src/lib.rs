//! The Block Economics Module
//!
//! Deterministic formula engine behind the economics lab:
//! - Block issuance with halving decay
//! - Activity and decentralization multipliers
//! - Annualization, supply projection and years-to-cap
//! - Live-vs-scenario comparison
//! - Market gate readiness previews
//! - Inflation against the governor target
//!
//! Every function here is pure and total over its numeric domain. Out-of-range
//! inputs are clamped rather than rejected.

pub mod coinbase;
pub mod error;
pub mod gates;
pub mod issuance;
pub mod multipliers;
pub mod params;
pub mod presets;
pub mod projection;
pub mod scenario;
pub mod sensitivity;
pub mod target;
pub mod unbounded;

pub use coinbase::{split_coinbase, CoinbaseSplit};
pub use error::{EconomicsError, Result};
pub use gates::{adjusted_readiness, gate_readiness, GateReadiness, GateState, GateStatus, Market};
pub use issuance::{calculate_issuance, halving_decay, halvings};
pub use multipliers::{activity_from_volume, decentralization_from_miners};
pub use params::EconomicsParams;
pub use presets::Preset;
pub use projection::{annual_issuance_from_reward, supply_projection, years_to_cap, ProjectionPoint};
pub use scenario::{
    compute_issuance, compute_scenario, IssuanceResult, NetworkSnapshot, ScenarioComparison,
    ScenarioDeltas, ScenarioInputs,
};
pub use sensitivity::{reward_sensitivity, SensitivityDriver, SensitivityEntry};
pub use target::{inflation_vs_target, InflationTarget};

/// Economic constants
pub mod constants {
    /// Hard supply cap (40M BLOCK)
    pub const MAX_SUPPLY: f64 = 40_000_000.0;

    /// Blocks between reward halvings
    pub const HALVING_INTERVAL: u64 = 1_000_000;

    /// Default base reward: 90% of the cap spread over 20M expected blocks
    pub const BASE_REWARD: f64 = MAX_SUPPLY * 0.9 / 20_000_000.0;

    /// Activity multiplier range
    pub const ACTIVITY_MIN: f64 = 0.5;
    pub const ACTIVITY_MAX: f64 = 2.0;

    /// Decentralization multiplier range
    pub const DECENTRALIZATION_MIN: f64 = 0.8;
    pub const DECENTRALIZATION_MAX: f64 = 1.5;

    /// Block time floor used when annualizing (ms)
    pub const MIN_BLOCK_TIME_MS: f64 = 500.0;

    /// 365 days in seconds
    pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

    /// Mempool fullness above which gate readiness is penalized (%)
    pub const MEMPOOL_PENALTY_THRESHOLD_PCT: f64 = 60.0;

    /// Readiness points lost per point of fullness over the threshold
    pub const MEMPOOL_PENALTY_RATE: f64 = 0.3;

    /// Governor inflation target when none is configured (5%)
    pub const DEFAULT_TARGET_INFLATION_BPS: u32 = 500;

    /// Highest accepted inflation target (100%)
    pub const MAX_TARGET_INFLATION_BPS: u32 = 10_000;
}
