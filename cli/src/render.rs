//! Terminal rendering for lab output

use block_economics::{
    CoinbaseSplit, GateReadiness, InflationTarget, IssuanceResult, ProjectionPoint,
    ScenarioComparison, SensitivityEntry,
};
use block_lab::LabReport;
use owo_colors::OwoColorize;
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════════════";

pub fn fmt_years(years: f64) -> String {
    if years.is_infinite() {
        "never".to_string()
    } else {
        format!("{:.2} yr", years)
    }
}

pub fn fmt_delta(delta: f64, decimals: usize) -> String {
    if delta.is_infinite() {
        return if delta > 0.0 { "+∞".to_string() } else { "-∞".to_string() };
    }
    if delta == 0.0 {
        return "±0".to_string();
    }
    format!("{:+.*}", decimals, delta)
}

pub fn fmt_block(amount: f64) -> String {
    if amount.abs() >= 1_000_000.0 {
        format!("{:.2}M BLOCK", amount / 1_000_000.0)
    } else if amount.abs() >= 1_000.0 {
        format!("{:.2}K BLOCK", amount / 1_000.0)
    } else {
        format!("{:.4} BLOCK", amount)
    }
}

pub fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.cyan().bold());
    let _ = writeln!(out, "{}", RULE.bright_black());
}

pub fn issuance(out: &mut String, result: &IssuanceResult) {
    let _ = writeln!(out, "Block Reward:      {}", fmt_block(result.reward_per_block).green());
    let _ = writeln!(out, "Activity:          {:.4}x", result.activity_multiplier);
    let _ = writeln!(out, "Decentralization:  {:.4}x", result.decentralization_multiplier);
    let _ = writeln!(out, "Halving Decay:     {:.6}", result.halving_decay);
    let _ = writeln!(out, "Annual Issuance:   {}", fmt_block(result.annual_issuance));
    let _ = writeln!(out, "Inflation:         {:.3}%", result.inflation_pct);
    let _ = writeln!(out, "Years to Cap:      {}", fmt_years(result.years_to_cap));
}

/// Within this many points of target counts as on target
const ON_TARGET_PCT: f64 = 0.25;

pub fn inflation_target(out: &mut String, target: &InflationTarget) {
    let gap = format!("{} pp", fmt_delta(target.gap_pct, 3));
    let gap = if target.on_target(ON_TARGET_PCT) {
        gap.green().to_string()
    } else if target.gap_pct > 0.0 {
        gap.red().to_string()
    } else {
        gap.yellow().to_string()
    };
    let _ = writeln!(
        out,
        "Target Inflation:  {:.2}% ({} bps), gap {}",
        target.target_pct, target.target_bps, gap
    );
}

pub fn comparison(out: &mut String, title: &str, cmp: &ScenarioComparison) {
    heading(out, title);
    let _ = writeln!(
        out,
        "{:<18}{:>18}{:>18}{:>14}",
        "", "scenario", "baseline", "delta"
    );
    let rows = [
        (
            "Block Reward",
            format!("{:.6}", cmp.scenario.reward_per_block),
            format!("{:.6}", cmp.baseline.reward_per_block),
            fmt_delta(cmp.deltas.reward, 6),
        ),
        (
            "Inflation %",
            format!("{:.3}", cmp.scenario.inflation_pct),
            format!("{:.3}", cmp.baseline.inflation_pct),
            fmt_delta(cmp.deltas.inflation_pct, 3),
        ),
        (
            "Years to Cap",
            fmt_years(cmp.scenario.years_to_cap),
            fmt_years(cmp.baseline.years_to_cap),
            fmt_delta(cmp.deltas.years_to_cap, 2),
        ),
    ];
    for (label, scenario, baseline, delta) in rows {
        let _ = writeln!(out, "{:<18}{:>18}{:>18}{:>14}", label, scenario, baseline, delta);
    }
}

pub fn gates(out: &mut String, gates: &[GateReadiness]) {
    heading(out, "🚦 Gate Readiness");
    if gates.is_empty() {
        let _ = writeln!(out, "{}", "No gates reported".bright_black());
        return;
    }
    for gate in gates {
        let adjusted = format!("{:>6.1}%", gate.adjusted_readiness_pct);
        let adjusted = if gate.adjusted_readiness_pct >= 100.0 {
            adjusted.green().to_string()
        } else if gate.adjusted_readiness_pct >= 50.0 {
            adjusted.yellow().to_string()
        } else {
            adjusted.red().to_string()
        };
        let _ = writeln!(
            out,
            "{:<10} base {:>6.1}%  →  {}",
            gate.market.to_string(),
            gate.base_readiness_pct,
            adjusted
        );
    }
}

pub fn projection(out: &mut String, points: &[ProjectionPoint], max_supply: f64) {
    heading(out, "📈 Supply Projection");
    for point in points {
        let filled = ((point.supply / max_supply) * 30.0).round().clamp(0.0, 30.0) as usize;
        let _ = writeln!(
            out,
            "Year {:>3}  {:>16}  {}{}",
            point.year,
            fmt_block(point.supply),
            "█".repeat(filled).green(),
            "░".repeat(30 - filled).bright_black()
        );
    }
}

pub fn sensitivity(out: &mut String, entries: &[SensitivityEntry]) {
    heading(out, "🎚  What moves block reward?");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<20} {:.6} → {:.6}  (swing {})",
            entry.driver.label(),
            entry.reward_low,
            entry.reward_high,
            fmt_delta(entry.swing, 6)
        );
    }
}

pub fn coinbase(out: &mut String, split: &CoinbaseSplit) {
    heading(out, "🪙 Coinbase Split");
    let _ = writeln!(
        out,
        "Treasury ({:.1}%):  {}",
        split.treasury_percent,
        fmt_block(split.treasury)
    );
    let _ = writeln!(out, "Miner:            {}", fmt_block(split.miner));
}

pub fn report(report: &LabReport, max_supply: f64) -> String {
    let mut out = String::new();

    let preset = report
        .preset
        .map(|p| p.to_string())
        .unwrap_or_else(|| "custom".to_string());
    let _ = writeln!(
        out,
        "{} revision {} · captured {} · preset {}",
        "📊 Economics Lab".cyan().bold(),
        report.live_revision,
        report.captured_at.format("%Y-%m-%d %H:%M:%S UTC"),
        preset.yellow()
    );

    heading(&mut out, "Scenario");
    issuance(&mut out, &report.comparison.scenario);
    inflation_target(&mut out, &report.inflation_target);

    comparison(&mut out, "⚖️  Scenario vs Live", &report.comparison);
    if let Some(pinned) = &report.pinned {
        comparison(&mut out, "📌 Scenario vs Pinned", pinned);
    }
    gates(&mut out, &report.gates);
    projection(&mut out, &report.projection, max_supply);
    sensitivity(&mut out, &report.sensitivity);
    coinbase(&mut out, &report.coinbase);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_years() {
        assert_eq!(fmt_years(f64::INFINITY), "never");
        assert_eq!(fmt_years(0.0), "0.00 yr");
        assert_eq!(fmt_years(12.345), "12.35 yr");
    }

    #[test]
    fn test_fmt_delta() {
        assert_eq!(fmt_delta(0.0, 3), "±0");
        assert_eq!(fmt_delta(1.5, 2), "+1.50");
        assert_eq!(fmt_delta(-0.25, 2), "-0.25");
        assert_eq!(fmt_delta(f64::INFINITY, 2), "+∞");
        assert_eq!(fmt_delta(f64::NEG_INFINITY, 2), "-∞");
    }

    #[test]
    fn test_inflation_target_line() {
        let mut out = String::new();
        inflation_target(&mut out, &block_economics::inflation_vs_target(6.5, 500));
        assert!(out.contains("5.00% (500 bps)"));
        assert!(out.contains("+1.500 pp"));
    }

    #[test]
    fn test_fmt_block() {
        assert_eq!(fmt_block(1.8), "1.8000 BLOCK");
        assert_eq!(fmt_block(56_765_000.0), "56.77M BLOCK");
        assert_eq!(fmt_block(2_500.0), "2.50K BLOCK");
    }
}
