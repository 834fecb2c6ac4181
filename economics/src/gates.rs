//! Market gate readiness preview
//!
//! Each gated market reports a readiness percentage from the launch governor.
//! Scenario inputs nudge it: a readiness boost is added directly and a crowded
//! mempool subtracts a penalty once fullness passes 60%.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MEMPOOL_PENALTY_RATE, MEMPOOL_PENALTY_THRESHOLD_PCT};
use crate::error::EconomicsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Storage,
    Compute,
    Energy,
    Ads,
}

impl Market {
    pub const ALL: [Market; 4] = [Market::Storage, Market::Compute, Market::Energy, Market::Ads];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Storage => "storage",
            Market::Compute => "compute",
            Market::Energy => "energy",
            Market::Ads => "ads",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = EconomicsError;

    /// Accepts the governor's gate names as well as the short forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "storage" | "storage_market" => Ok(Market::Storage),
            "compute" | "compute_market" => Ok(Market::Compute),
            "energy" | "energy_market" => Ok(Market::Energy),
            "ads" | "ad" | "ad_market" => Ok(Market::Ads),
            _ => Err(EconomicsError::UnknownMarket(s.to_string())),
        }
    }
}

/// Governor gate lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    Inactive,
    Active,
    Rehearsal,
    Trade,
    #[serde(other)]
    Unknown,
}

impl GateState {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "inactive" => GateState::Inactive,
            "active" => GateState::Active,
            "rehearsal" => GateState::Rehearsal,
            "trade" => GateState::Trade,
            _ => GateState::Unknown,
        }
    }
}

/// One gate as reported by `governor.status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateStatus {
    pub market: Market,
    pub state: GateState,
    /// Consecutive healthy epochs so far
    pub enter_streak: u64,
    /// Healthy epochs needed to open; zero when the governor did not say
    pub streak_required: u64,
}

impl GateStatus {
    /// 100 once trading, otherwise progress through the required streak.
    pub fn base_readiness_pct(&self) -> f64 {
        if self.state == GateState::Trade {
            return 100.0;
        }
        if self.streak_required == 0 {
            return 0.0;
        }
        (self.enter_streak as f64 / self.streak_required as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateReadiness {
    pub market: Market,
    pub base_readiness_pct: f64,
    pub adjusted_readiness_pct: f64,
}

/// Readiness after the scenario's boost and mempool penalty, in `[0, 100]`.
pub fn adjusted_readiness(
    base_readiness_pct: f64,
    mempool_fullness_pct: f64,
    readiness_boost_pct: f64,
) -> f64 {
    let mempool_penalty =
        ((mempool_fullness_pct - MEMPOOL_PENALTY_THRESHOLD_PCT) * MEMPOOL_PENALTY_RATE).max(0.0);
    (base_readiness_pct + readiness_boost_pct - mempool_penalty).clamp(0.0, 100.0)
}

/// Readiness for every reported gate, in market order.
pub fn gate_readiness(
    gates: &[GateStatus],
    mempool_fullness_pct: f64,
    readiness_boost_pct: f64,
) -> Vec<GateReadiness> {
    let mut out: Vec<GateReadiness> = gates
        .iter()
        .map(|gate| {
            let base = gate.base_readiness_pct();
            GateReadiness {
                market: gate.market,
                base_readiness_pct: base,
                adjusted_readiness_pct: adjusted_readiness(
                    base,
                    mempool_fullness_pct,
                    readiness_boost_pct,
                ),
            }
        })
        .collect();
    out.sort_by_key(|g| g.market);
    out
}
