//! End-to-end runs of the `econ-lab` binary against the built-in mock network.
//!
//! No node is needed: every command uses `--mock`.

use serde_json::Value;
use std::process::{Command, Output};

fn econ_lab(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_econ-lab"))
        .args(args)
        .env_remove("BLOCK_LAB_API_BASE")
        .env_remove("BLOCK_LAB_API_KEY")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run econ-lab")
}

fn json(args: &[&str]) -> Value {
    let output = econ_lab(args);
    assert!(
        output.status.success(),
        "econ-lab {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_issuance_json() {
    let result = json(&["--mock", "--json", "issuance"]);

    // Height 1.2M is past the first halving
    assert_eq!(result["halving_decay"], 0.5);
    assert_eq!(result["activity_multiplier"], 1.0);
    assert!(result["reward_per_block"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_multipliers_without_fetch() {
    let result = json(&["--json", "multipliers", "--volume", "1000", "--miners", "0"]);

    assert_eq!(result["activity_multiplier"], 2.0);
    assert_eq!(result["decentralization_multiplier"], 0.8);

    // Below saturation the log curve applies: 1 + log2(5) * 0.3
    let result = json(&["--json", "multipliers", "--volume", "5", "--miners", "1000"]);
    let activity = result["activity_multiplier"].as_f64().unwrap();
    assert!((activity - 1.6965784284662087).abs() < 1e-12);
    let decentralization = result["decentralization_multiplier"].as_f64().unwrap();
    assert!((decentralization - 1.2).abs() < 1e-12);
}

#[test]
fn test_connection_flags_after_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("econ-lab.toml");
    std::fs::write(&path, "projection_years = 3\n").unwrap();

    let report = json(&[
        "scenario",
        "--api",
        "http://127.0.0.1:1",
        "--config",
        path.to_str().unwrap(),
        "--mock",
        "--json",
    ]);
    assert_eq!(report["projection"].as_array().unwrap().len(), 4);
}

#[test]
fn test_readiness_json() {
    let gates = json(&["--mock", "--json", "readiness", "--boost", "-10"]);
    let gates = gates.as_array().unwrap();

    assert_eq!(gates.len(), 4);
    assert_eq!(gates[0]["market"], "storage");
    assert_eq!(gates[0]["adjusted_readiness_pct"], 90.0);
    assert_eq!(gates[3]["market"], "ads");
    assert_eq!(gates[3]["adjusted_readiness_pct"], 0.0);
}

#[test]
fn test_project_years() {
    let points = json(&["--mock", "--json", "project", "--years", "3"]);
    let points = points.as_array().unwrap();

    assert_eq!(points.len(), 4);
    assert_eq!(points[0]["supply"], 8_500_000.0);
    assert!(points[3]["supply"].as_f64().unwrap() > points[0]["supply"].as_f64().unwrap());
}

#[test]
fn test_scenario_with_preset_and_compare() {
    let report = json(&[
        "--mock",
        "--json",
        "scenario",
        "--preset",
        "surge",
        "--compare",
        "early",
    ]);

    assert_eq!(report["preset"], "surge");
    assert_eq!(report["inputs"]["network"]["transaction_volume_ratio"], 2.5);
    assert!(report["comparison"]["deltas"]["reward"].as_f64().unwrap() > 0.0);
    assert!(report["pinned"]["deltas"]["reward"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_scenario_overrides_clear_preset() {
    let report = json(&[
        "--mock", "--json", "scenario", "--preset", "stress", "--miners", "500",
    ]);

    assert_eq!(report["preset"], Value::Null);
    assert_eq!(report["inputs"]["network"]["unique_miner_count"], 500);
}

#[test]
fn test_scenario_inflation_target() {
    let report = json(&["--mock", "--json", "scenario", "--preset", "growth", "--target-bps", "800"]);

    let inflation = report["comparison"]["scenario"]["inflation_pct"].as_f64().unwrap();
    let target = &report["inflation_target"];
    assert_eq!(target["target_bps"], 800);
    assert_eq!(target["target_pct"], 8.0);
    assert!((target["gap_pct"].as_f64().unwrap() - (inflation - 8.0)).abs() < 1e-9);
    // The target is a lab setting and leaves the preset active
    assert_eq!(report["preset"], "growth");
}

#[test]
fn test_unknown_preset_rejected() {
    let output = econ_lab(&["--mock", "scenario", "--preset", "moon"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("moon"));
}
