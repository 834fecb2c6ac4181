//! Protocol parameters consumed by the scenario computation

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_REWARD, HALVING_INTERVAL, MAX_SUPPLY};
use crate::error::{EconomicsError, Result};

/// Issuance parameters mirrored from the consensus implementation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsParams {
    /// Reward per block before multipliers and decay (BLOCK)
    pub base_reward: f64,

    /// Total supply cap (BLOCK)
    pub max_supply: f64,

    /// Blocks between halvings
    pub halving_interval: u64,
}

impl Default for EconomicsParams {
    fn default() -> Self {
        Self {
            base_reward: BASE_REWARD,
            max_supply: MAX_SUPPLY,
            halving_interval: HALVING_INTERVAL,
        }
    }
}

impl EconomicsParams {
    pub fn validate(&self) -> Result<()> {
        if !self.base_reward.is_finite() || self.base_reward <= 0.0 {
            return Err(EconomicsError::InvalidBaseReward(self.base_reward));
        }
        if !self.max_supply.is_finite() || self.max_supply <= 0.0 {
            return Err(EconomicsError::InvalidMaxSupply(self.max_supply));
        }
        if self.halving_interval == 0 {
            return Err(EconomicsError::ZeroHalvingInterval);
        }
        Ok(())
    }
}
