//! Annualization and supply trajectory

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_BLOCK_TIME_MS, SECONDS_PER_YEAR};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: u32,
    pub supply: f64,
}

/// Annual issuance at a constant reward per block.
///
/// Block time is floored at 500 ms.
pub fn annual_issuance_from_reward(reward_per_block: f64, block_time_ms: f64) -> f64 {
    let block_time_secs = block_time_ms.max(MIN_BLOCK_TIME_MS) / 1000.0;
    let blocks_per_year = SECONDS_PER_YEAR / block_time_secs;
    reward_per_block * blocks_per_year
}

/// Supply at the start of each year for `years` years (`years + 1` points).
///
/// Supply never exceeds `max_supply` and stays pinned once it gets there.
pub fn supply_projection(
    current_supply: f64,
    annual_issuance: f64,
    years: u32,
    max_supply: f64,
) -> Vec<ProjectionPoint> {
    let mut supply = current_supply.min(max_supply);
    let mut points = Vec::with_capacity(years as usize + 1);
    points.push(ProjectionPoint { year: 0, supply });

    for year in 1..=years {
        supply = (supply + annual_issuance).min(max_supply);
        points.push(ProjectionPoint { year, supply });
    }

    points
}

/// Years until the cap is reached; `+inf` when nothing is being issued.
pub fn years_to_cap(current_supply: f64, annual_issuance: f64, max_supply: f64) -> f64 {
    if annual_issuance <= 0.0 {
        return f64::INFINITY;
    }
    ((max_supply - current_supply) / annual_issuance).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: f64 = 40_000_000.0;

    #[test]
    fn test_annual_issuance_one_second_blocks() {
        assert_eq!(annual_issuance_from_reward(1.0, 1000.0), 31_536_000.0);
        assert_eq!(annual_issuance_from_reward(2.0, 2000.0), 31_536_000.0);
    }

    #[test]
    fn test_annual_issuance_floors_block_time() {
        assert_eq!(
            annual_issuance_from_reward(1.0, 1.0),
            annual_issuance_from_reward(1.0, 500.0)
        );
        assert_eq!(
            annual_issuance_from_reward(1.0, 0.0),
            annual_issuance_from_reward(1.0, 500.0)
        );
    }

    #[test]
    fn test_projection_length_and_start() {
        let points = supply_projection(1_000.0, 10.0, 5, MAX);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], ProjectionPoint { year: 0, supply: 1_000.0 });
        assert_eq!(points[5], ProjectionPoint { year: 5, supply: 1_050.0 });
    }

    #[test]
    fn test_projection_pins_at_cap() {
        let points = supply_projection(MAX - 25.0, 10.0, 6, MAX);
        assert!(points.iter().all(|p| p.supply <= MAX));

        let first_capped = points.iter().position(|p| p.supply == MAX).unwrap();
        assert_eq!(first_capped, 3);
        assert!(points[first_capped..].iter().all(|p| p.supply == MAX));
    }

    #[test]
    fn test_projection_is_restartable() {
        let a = supply_projection(12_345.0, 678.0, 30, MAX);
        let b = supply_projection(12_345.0, 678.0, 30, MAX);
        assert_eq!(a, b);
    }

    #[test]
    fn test_projection_caps_starting_supply() {
        let points = supply_projection(MAX * 2.0, 10.0, 2, MAX);
        assert!(points.iter().all(|p| p.supply == MAX));
    }

    #[test]
    fn test_years_to_cap() {
        assert_eq!(years_to_cap(MAX, 1000.0, MAX), 0.0);
        assert_eq!(years_to_cap(MAX + 5_000.0, 1000.0, MAX), 0.0);
        assert_eq!(years_to_cap(MAX - 5_000.0, 1000.0, MAX), 5.0);
        assert_eq!(years_to_cap(123.0, 0.0, MAX), f64::INFINITY);
        assert_eq!(years_to_cap(123.0, -1.0, MAX), f64::INFINITY);
    }
}
