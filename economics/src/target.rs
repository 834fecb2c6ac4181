//! Scenario inflation measured against the governor's target

use serde::{Deserialize, Serialize};

use crate::constants::MAX_TARGET_INFLATION_BPS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationTarget {
    pub target_bps: u32,
    pub target_pct: f64,
    /// Inflation minus target, in percentage points; positive means above target
    pub gap_pct: f64,
}

impl InflationTarget {
    pub fn on_target(&self, tolerance_pct: f64) -> bool {
        self.gap_pct.abs() <= tolerance_pct
    }
}

/// Compare `inflation_pct` with a target in basis points (capped at 100%).
pub fn inflation_vs_target(inflation_pct: f64, target_bps: u32) -> InflationTarget {
    let target_bps = target_bps.min(MAX_TARGET_INFLATION_BPS);
    let target_pct = target_bps as f64 / 100.0;

    InflationTarget {
        target_bps,
        target_pct,
        gap_pct: inflation_pct - target_pct,
    }
}
