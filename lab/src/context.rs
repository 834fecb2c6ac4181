//! Explicit lab state
//!
//! Everything the economics lab remembers between refreshes lives here and is
//! handed to whoever renders or updates it.

use block_economics::{
    compute_issuance, gate_readiness, inflation_vs_target, reward_sensitivity, split_coinbase,
    supply_projection, CoinbaseSplit, EconomicsParams, GateReadiness, InflationTarget,
    IssuanceResult, NetworkSnapshot, Preset, ProjectionPoint, ScenarioComparison,
    ScenarioInputs, SensitivityEntry,
};
use block_economics::constants::MAX_TARGET_INFLATION_BPS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LabConfig;
use crate::source::LiveData;

/// One user edit to the scenario inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum InputEdit {
    TransactionVolumeRatio(f64),
    UniqueMinerCount(u64),
    BlockHeight(u64),
    BlockTimeMs(f64),
    MempoolFullnessPct(f64),
    IssuedSupply(f64),
    ReadinessBoostPct(f64),
    /// Governor target; a lab setting, so it survives presets and refreshes
    TargetInflationBps(u32),
}

impl InputEdit {
    fn apply(&self, inputs: &mut ScenarioInputs) {
        let net = &mut inputs.network;
        match *self {
            InputEdit::TransactionVolumeRatio(v) => net.transaction_volume_ratio = v,
            InputEdit::UniqueMinerCount(v) => net.unique_miner_count = v,
            InputEdit::BlockHeight(v) => net.block_height = v,
            InputEdit::BlockTimeMs(v) => net.block_time_ms = v,
            InputEdit::MempoolFullnessPct(v) => net.mempool_fullness_pct = v,
            InputEdit::IssuedSupply(v) => net.issued_supply = v,
            InputEdit::ReadinessBoostPct(v) => inputs.readiness_boost_pct = v,
            InputEdit::TargetInflationBps(_) => {}
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    pub live_revision: u64,
    pub captured_at: DateTime<Utc>,
    pub inputs: ScenarioInputs,
    pub preset: Option<Preset>,
    pub comparison: ScenarioComparison,
    /// Scenario inflation against the governor target
    pub inflation_target: InflationTarget,
    /// Scenario diffed against the pinned inputs instead of live
    pub pinned: Option<ScenarioComparison>,
    pub gates: Vec<GateReadiness>,
    pub projection: Vec<ProjectionPoint>,
    pub sensitivity: Vec<SensitivityEntry>,
    pub coinbase: CoinbaseSplit,
}

#[derive(Debug, Clone, Copy)]
struct CachedBaseline {
    revision: u64,
    result: IssuanceResult,
}

#[derive(Debug, Clone)]
pub struct LabContext {
    params: EconomicsParams,
    projection_years: u32,
    treasury_percent: f64,
    sensitivity_step_pct: f64,
    target_inflation_bps: u32,
    live: Option<LiveData>,
    live_revision: u64,
    inputs: ScenarioInputs,
    preset: Option<Preset>,
    pinned: Option<ScenarioInputs>,
    baseline: Option<CachedBaseline>,
}

impl LabContext {
    pub fn new(config: &LabConfig) -> Self {
        Self {
            params: config.economics,
            projection_years: config.projection_years,
            treasury_percent: config.treasury_percent,
            sensitivity_step_pct: config.sensitivity_step_pct,
            target_inflation_bps: config.target_inflation_bps,
            live: None,
            live_revision: 0,
            inputs: ScenarioInputs::default(),
            preset: None,
            pinned: None,
            baseline: None,
        }
    }

    pub fn params(&self) -> &EconomicsParams {
        &self.params
    }

    pub fn live(&self) -> Option<&LiveData> {
        self.live.as_ref()
    }

    pub fn live_revision(&self) -> u64 {
        self.live_revision
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    pub fn target_inflation_bps(&self) -> u32 {
        self.target_inflation_bps
    }

    pub fn pinned(&self) -> Option<&ScenarioInputs> {
        self.pinned.as_ref()
    }

    /// Replace the live data wholesale.
    ///
    /// The cached baseline is dropped. The very first snapshot also seeds the
    /// scenario inputs; later ones leave the user's edits alone unless a
    /// preset is active, in which case the preset is re-applied to the new
    /// snapshot.
    pub fn apply_live(&mut self, data: LiveData) {
        let first = self.live.is_none();
        self.live_revision += 1;
        self.baseline = None;

        if first {
            self.inputs = ScenarioInputs::from(data.snapshot);
        } else if let Some(preset) = self.preset {
            self.inputs = preset.apply(&data.snapshot);
        }

        log::debug!(
            "Live snapshot revision {} (height {})",
            self.live_revision,
            data.snapshot.block_height
        );
        self.live = Some(data);
    }

    /// Apply an edit, clamped into its domain. Network edits clear the
    /// active preset; a target change does not.
    pub fn apply_edit(&mut self, edit: InputEdit) {
        if let InputEdit::TargetInflationBps(bps) = edit {
            self.target_inflation_bps = bps.min(MAX_TARGET_INFLATION_BPS);
            return;
        }
        edit.apply(&mut self.inputs);
        self.inputs = self.inputs.clamped();
        self.preset = None;
    }

    /// Replace the inputs with `preset` applied to the live snapshot.
    ///
    /// Returns false when there is no live snapshot yet.
    pub fn apply_preset(&mut self, preset: Preset) -> bool {
        let Some(live) = &self.live else {
            return false;
        };
        self.inputs = preset.apply(&live.snapshot);
        self.preset = Some(preset);
        true
    }

    pub fn reset_to_live(&mut self) -> bool {
        self.apply_preset(Preset::Live)
    }

    /// Remember the current inputs as a comparison point.
    pub fn pin(&mut self) {
        self.pinned = Some(self.inputs);
    }

    pub fn unpin(&mut self) {
        self.pinned = None;
    }

    /// Baseline issuance for the current live revision, computed at most once
    /// per revision.
    fn baseline(&mut self, live: &NetworkSnapshot) -> IssuanceResult {
        match self.baseline {
            Some(cached) if cached.revision == self.live_revision => cached.result,
            _ => {
                let result = compute_issuance(live, &self.params);
                self.baseline = Some(CachedBaseline {
                    revision: self.live_revision,
                    result,
                });
                result
            }
        }
    }

    /// Build a report, or `None` until the first live snapshot arrives.
    pub fn report(&mut self) -> Option<LabReport> {
        let live = self.live.clone()?;
        let baseline = self.baseline(&live.snapshot);
        let scenario = compute_issuance(&self.inputs.network, &self.params);

        let pinned = self.pinned.map(|pinned| {
            ScenarioComparison::new(scenario, compute_issuance(&pinned.network, &self.params))
        });

        Some(LabReport {
            live_revision: self.live_revision,
            captured_at: live.captured_at,
            inputs: self.inputs,
            preset: self.preset,
            comparison: ScenarioComparison::new(scenario, baseline),
            inflation_target: inflation_vs_target(scenario.inflation_pct, self.target_inflation_bps),
            pinned,
            gates: gate_readiness(
                &live.gates,
                self.inputs.network.mempool_fullness_pct,
                self.inputs.readiness_boost_pct,
            ),
            projection: supply_projection(
                self.inputs.network.issued_supply,
                scenario.annual_issuance,
                self.projection_years,
                self.params.max_supply,
            ),
            sensitivity: reward_sensitivity(&self.inputs, &self.params, self.sensitivity_step_pct),
            coinbase: split_coinbase(scenario.reward_per_block, self.treasury_percent),
        })
    }
}
