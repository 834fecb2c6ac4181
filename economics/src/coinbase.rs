//! Coinbase split between the treasury and the block producer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinbaseSplit {
    pub treasury_percent: f64,
    pub treasury: f64,
    pub miner: f64,
}

pub fn split_coinbase(reward_per_block: f64, treasury_percent: f64) -> CoinbaseSplit {
    let treasury_percent = treasury_percent.clamp(0.0, 100.0);
    let treasury = reward_per_block * treasury_percent / 100.0;

    CoinbaseSplit {
        treasury_percent,
        treasury,
        miner: reward_per_block - treasury,
    }
}
