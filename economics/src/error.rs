//! Economics error types

use thiserror::Error;

/// Raised only when validating configuration; the formulas never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomicsError {
    #[error("Invalid base reward: {0}")]
    InvalidBaseReward(f64),

    #[error("Invalid max supply: {0}")]
    InvalidMaxSupply(f64),

    #[error("Halving interval must be greater than zero")]
    ZeroHalvingInterval,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown market: {0}")]
    UnknownMarket(String),
}

pub type Result<T> = std::result::Result<T, EconomicsError>;
