//! Where live network snapshots come from
//!
//! The lab only needs one thing from the outside world: a fresh
//! [`LiveData`] now and then. A fetch either yields a complete snapshot or
//! fails as a whole; nothing is merged from partial answers.

use async_trait::async_trait;
use block_economics::{GateState, GateStatus, Market, NetworkSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::rpc::{ClientError, RpcClient};

/// One refresh worth of chain state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveData {
    pub snapshot: NetworkSnapshot,
    pub gates: Vec<GateStatus>,
    pub captured_at: DateTime<Utc>,
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<LiveData, ClientError>;

    fn describe(&self) -> String;
}

// ============================================================================
// JSON-RPC source
// ============================================================================

#[derive(Debug, Deserialize)]
struct BlockHeightResult {
    height: u64,
}

#[derive(Debug, Deserialize)]
struct ConsensusStatsResult {
    avg_block_time_ms: f64,
    #[serde(default = "default_volume_ratio")]
    tx_volume_ratio: f64,
    #[serde(default)]
    unique_miners: u64,
    #[serde(default)]
    issued_supply: f64,
}

fn default_volume_ratio() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct MempoolStatsResult {
    size: u64,
    capacity: u64,
}

impl MempoolStatsResult {
    fn fullness_pct(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.size as f64 / self.capacity as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Deserialize)]
struct GovernorStatusResult {
    #[serde(default)]
    gates: Vec<RawGate>,
}

#[derive(Debug, Deserialize)]
struct RawGate {
    #[serde(alias = "gate")]
    name: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    enter_streak: Option<u64>,
    #[serde(default)]
    streak_required: Option<u64>,
}

impl RawGate {
    fn into_status(self) -> Option<GateStatus> {
        let market = match self.name.parse::<Market>() {
            Ok(market) => market,
            Err(e) => {
                log::debug!("Skipping gate: {}", e);
                return None;
            }
        };
        Some(GateStatus {
            market,
            state: GateState::parse(&self.state),
            enter_streak: self.enter_streak.unwrap_or(0),
            streak_required: self.streak_required.unwrap_or(0),
        })
    }
}

/// Assembles a snapshot from `consensus.*`, `mempool.stats` and
/// `governor.status`.
pub struct RpcSnapshotSource {
    client: RpcClient,
}

impl RpcSnapshotSource {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SnapshotSource for RpcSnapshotSource {
    async fn fetch(&self) -> Result<LiveData, ClientError> {
        let (height, stats, mempool, governor) = tokio::try_join!(
            self.client
                .call::<BlockHeightResult>("consensus.block_height", None),
            self.client
                .call::<ConsensusStatsResult>("consensus.stats", None),
            self.client
                .call::<MempoolStatsResult>("mempool.stats", None),
            self.client
                .call::<GovernorStatusResult>("governor.status", Some(json!({}))),
        )?;

        if stats.avg_block_time_ms.is_nan() || stats.avg_block_time_ms <= 0.0 {
            return Err(ClientError::InvalidResponse(format!(
                "non-positive avg_block_time_ms: {}",
                stats.avg_block_time_ms
            )));
        }

        let snapshot = NetworkSnapshot {
            transaction_volume_ratio: stats.tx_volume_ratio,
            unique_miner_count: stats.unique_miners,
            block_height: height.height,
            block_time_ms: stats.avg_block_time_ms,
            mempool_fullness_pct: mempool.fullness_pct(),
            issued_supply: stats.issued_supply.max(0.0),
        };
        let gates: Vec<GateStatus> = governor
            .gates
            .into_iter()
            .filter_map(RawGate::into_status)
            .collect();

        log::info!(
            "✅ Snapshot at height {}: {} miners, {:.1}% mempool, {} gates",
            snapshot.block_height,
            snapshot.unique_miner_count,
            snapshot.mempool_fullness_pct,
            gates.len()
        );

        Ok(LiveData {
            snapshot,
            gates,
            captured_at: Utc::now(),
        })
    }

    fn describe(&self) -> String {
        format!("rpc {}", self.client.rpc_url())
    }
}

// ============================================================================
// Fixed source
// ============================================================================

/// Always returns the same data; used for offline runs and tests.
#[derive(Debug, Clone)]
pub struct StaticSource {
    data: LiveData,
}

impl StaticSource {
    pub fn new(snapshot: NetworkSnapshot, gates: Vec<GateStatus>) -> Self {
        Self {
            data: LiveData {
                snapshot,
                gates,
                captured_at: Utc::now(),
            },
        }
    }

    /// A plausible early-mainnet network for offline exploration.
    pub fn mock_baseline() -> Self {
        let snapshot = NetworkSnapshot {
            transaction_volume_ratio: 1.0,
            unique_miner_count: 48,
            block_height: 1_200_000,
            block_time_ms: 1000.0,
            mempool_fullness_pct: 35.0,
            issued_supply: 8_500_000.0,
        };
        let gates = vec![
            GateStatus {
                market: Market::Storage,
                state: GateState::Trade,
                enter_streak: 24,
                streak_required: 24,
            },
            GateStatus {
                market: Market::Compute,
                state: GateState::Rehearsal,
                enter_streak: 18,
                streak_required: 24,
            },
            GateStatus {
                market: Market::Energy,
                state: GateState::Active,
                enter_streak: 9,
                streak_required: 24,
            },
            GateStatus {
                market: Market::Ads,
                state: GateState::Inactive,
                enter_streak: 0,
                streak_required: 24,
            },
        ];
        Self::new(snapshot, gates)
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn fetch(&self) -> Result<LiveData, ClientError> {
        let mut data = self.data.clone();
        data.captured_at = Utc::now();
        Ok(data)
    }

    fn describe(&self) -> String {
        "mock baseline".to_string()
    }
}
