//! Block reward calculation
//!
//! ```text
//! reward = base_reward * activity * decentralization * 0.5^halvings
//! ```

use crate::constants::{ACTIVITY_MAX, ACTIVITY_MIN, DECENTRALIZATION_MAX, DECENTRALIZATION_MIN};

/// Smallest power of two an f64 can hold is 2^-1074; past that the decay
/// would round to zero.
const MAX_EFFECTIVE_HALVINGS: u64 = 1074;

/// Number of halvings applied at `block_height`.
///
/// A zero interval is treated as one block so the function stays total.
pub fn halvings(block_height: u64, halving_interval: u64) -> u64 {
    block_height / halving_interval.max(1)
}

/// `0.5^halvings`, always in `(0, 1]`.
pub fn halving_decay(halvings: u64) -> f64 {
    0.5_f64.powi(halvings.min(MAX_EFFECTIVE_HALVINGS) as i32)
}

/// Reward per block after clamping both multipliers and applying halving decay.
pub fn calculate_issuance(
    base_reward: f64,
    activity_multiplier: f64,
    decentralization_multiplier: f64,
    block_height: u64,
    halving_interval: u64,
) -> f64 {
    let decay = halving_decay(halvings(block_height, halving_interval));
    let activity = activity_multiplier.clamp(ACTIVITY_MIN, ACTIVITY_MAX);
    let decentralization =
        decentralization_multiplier.clamp(DECENTRALIZATION_MIN, DECENTRALIZATION_MAX);

    base_reward * activity * decentralization * decay
}
