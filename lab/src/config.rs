//! Lab configuration file (econ-lab.toml) support
//!
//! Example:
//! ```toml
//! api_base = "http://localhost:3030"
//! poll_interval_secs = 5
//! debounce_ms = 300
//!
//! [economics]
//! base_reward = 1.8
//! max_supply = 40000000.0
//! halving_interval = 1000000
//! ```
//!
//! `BLOCK_LAB_API_BASE` and `BLOCK_LAB_API_KEY` override the file.

use block_economics::constants::{DEFAULT_TARGET_INFLATION_BPS, MAX_TARGET_INFLATION_BPS};
use block_economics::{EconomicsError, EconomicsParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_API_BASE: &str = "BLOCK_LAB_API_BASE";
pub const ENV_API_KEY: &str = "BLOCK_LAB_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Invalid economics parameters: {0}")]
    Economics(#[from] EconomicsError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LabConfig {
    /// Node API root; JSON-RPC lives at `{api_base}/rpc`
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer token for the node API
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Quiet period after the last input edit before recomputing
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_projection_years")]
    pub projection_years: u32,

    /// Share of each block reward routed to the treasury
    #[serde(default = "default_treasury_percent")]
    pub treasury_percent: f64,

    /// Step used for the reward sensitivity table
    #[serde(default = "default_sensitivity_step_pct")]
    pub sensitivity_step_pct: f64,

    /// Governor inflation target the scenario is measured against
    #[serde(default = "default_target_inflation_bps")]
    pub target_inflation_bps: u32,

    #[serde(default)]
    pub economics: EconomicsParams,
}

fn default_api_base() -> String {
    "http://localhost:3030".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_projection_years() -> u32 {
    10
}

fn default_treasury_percent() -> f64 {
    10.0
}

fn default_sensitivity_step_pct() -> f64 {
    10.0
}

fn default_target_inflation_bps() -> u32 {
    DEFAULT_TARGET_INFLATION_BPS
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            api_base: default_api_base(),
            api_key: None,
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            debounce_ms: default_debounce_ms(),
            projection_years: default_projection_years(),
            treasury_percent: default_treasury_percent(),
            sensitivity_step_pct: default_sensitivity_step_pct(),
            target_inflation_bps: default_target_inflation_bps(),
            economics: EconomicsParams::default(),
        }
    }
}

impl LabConfig {
    /// Load configuration from file and apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        log::debug!("Loaded lab config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Like [`LabConfig::load`], but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        log::info!(
            "No config at {}, using defaults",
            path.as_ref().display()
        );
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(base) = std::env::var(ENV_API_BASE) {
            if !base.trim().is_empty() {
                self.api_base = base.trim().to_string();
            }
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            self.api_key = if key.trim().is_empty() {
                None
            } else {
                Some(key.trim().to_string())
            };
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base",
                message: format!("expected an http(s) URL, got {:?}", self.api_base),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.treasury_percent) {
            return Err(ConfigError::InvalidValue {
                field: "treasury_percent",
                message: format!("{} is outside 0..=100", self.treasury_percent),
            });
        }
        if self.target_inflation_bps > MAX_TARGET_INFLATION_BPS {
            return Err(ConfigError::InvalidValue {
                field: "target_inflation_bps",
                message: format!(
                    "{} is above {}",
                    self.target_inflation_bps, MAX_TARGET_INFLATION_BPS
                ),
            });
        }
        self.economics.validate()?;
        Ok(())
    }

    /// `{api_base}/rpc` without a doubled slash
    pub fn rpc_url(&self) -> String {
        format!("{}/rpc", self.api_base.trim_end_matches('/'))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("econ-lab.toml")
    }
}
