//! econ-lab - The Block economics lab in the terminal

mod render;

use block_economics::{
    compute_issuance, gate_readiness, inflation_vs_target, supply_projection, EconomicsParams,
    Preset,
};
use block_lab::{
    InputEdit, LabConfig, LabContext, LabSession, LiveData, RpcClient, RpcSnapshotSource,
    SnapshotSource, StaticSource,
};
use clap::{Args, Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "econ-lab")]
#[command(about = "The Block economics lab: issuance, readiness and what-if scenarios")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Node API base URL (overrides config and environment)
    #[arg(short, long, value_name = "URL", global = true)]
    api: Option<String>,

    /// Use the built-in mock network instead of a live node
    #[arg(long, global = true)]
    mock: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Block reward, annual issuance and inflation for the live network
    Issuance,

    /// Activity and decentralization multipliers
    Multipliers {
        /// Transaction volume ratio (defaults to live)
        #[arg(long)]
        volume: Option<f64>,

        /// Unique miner count (defaults to live)
        #[arg(long)]
        miners: Option<u64>,
    },

    /// Project circulating supply forward
    Project {
        /// Years to project (defaults to config)
        #[arg(short, long)]
        years: Option<u32>,
    },

    /// Market gate readiness with the mempool penalty applied
    Readiness {
        /// Readiness boost in percentage points
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        boost: f64,
    },

    /// Compare a what-if scenario against the live network
    Scenario {
        /// Start from a preset (live, early, growth, mainnet, stress, surge)
        #[arg(short, long)]
        preset: Option<Preset>,

        /// Also diff the scenario against this preset
        #[arg(long, value_name = "PRESET")]
        compare: Option<Preset>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Poll the node and redraw the lab until Ctrl-C
    Watch {
        /// Preset to keep applied across refreshes
        #[arg(short, long)]
        preset: Option<Preset>,
    },
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// Readiness boost in percentage points
    #[arg(long, allow_negative_numbers = true)]
    boost: Option<f64>,

    /// Transaction volume ratio
    #[arg(long)]
    volume: Option<f64>,

    /// Unique miner count
    #[arg(long)]
    miners: Option<u64>,

    /// Block height
    #[arg(long)]
    height: Option<u64>,

    /// Average block time in milliseconds
    #[arg(long)]
    block_time: Option<f64>,

    /// Mempool fullness percentage
    #[arg(long)]
    mempool: Option<f64>,

    /// Circulating supply
    #[arg(long)]
    supply: Option<f64>,

    /// Governor inflation target in basis points
    #[arg(long, value_name = "BPS")]
    target_bps: Option<u32>,
}

impl Overrides {
    fn edits(&self) -> Vec<InputEdit> {
        let mut edits = Vec::new();
        if let Some(v) = self.volume {
            edits.push(InputEdit::TransactionVolumeRatio(v));
        }
        if let Some(v) = self.miners {
            edits.push(InputEdit::UniqueMinerCount(v));
        }
        if let Some(v) = self.height {
            edits.push(InputEdit::BlockHeight(v));
        }
        if let Some(v) = self.block_time {
            edits.push(InputEdit::BlockTimeMs(v));
        }
        if let Some(v) = self.mempool {
            edits.push(InputEdit::MempoolFullnessPct(v));
        }
        if let Some(v) = self.supply {
            edits.push(InputEdit::IssuedSupply(v));
        }
        if let Some(v) = self.boost {
            edits.push(InputEdit::ReadinessBoostPct(v));
        }
        if let Some(v) = self.target_bps {
            edits.push(InputEdit::TargetInflationBps(v));
        }
        edits
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let source = build_source(&cli, &config)?;
    let params = config.economics;

    match cli.command {
        Commands::Issuance => {
            let live = source.fetch().await?;
            let result = compute_issuance(&live.snapshot, &params);

            if cli.json {
                return print_json(&result);
            }
            render_live_header(&live, source.as_ref());
            let mut out = String::new();
            render::heading(&mut out, "💰 Issuance");
            render::issuance(&mut out, &result);
            render::inflation_target(
                &mut out,
                &inflation_vs_target(result.inflation_pct, config.target_inflation_bps),
            );
            println!("{}", out);
        }

        Commands::Multipliers { volume, miners } => {
            let snapshot = if volume.is_some() && miners.is_some() {
                None
            } else {
                Some(source.fetch().await?.snapshot)
            };
            let volume = volume
                .or(snapshot.map(|s| s.transaction_volume_ratio))
                .unwrap_or(1.0);
            let miners = miners
                .or(snapshot.map(|s| s.unique_miner_count))
                .unwrap_or(0);

            let report = MultiplierReport {
                transaction_volume_ratio: volume,
                activity_multiplier: block_economics::activity_from_volume(volume),
                unique_miner_count: miners,
                decentralization_multiplier: block_economics::decentralization_from_miners(miners),
            };

            if cli.json {
                return print_json(&report);
            }
            let mut out = String::new();
            render::heading(&mut out, "⚙️  Multipliers");
            out.push_str(&format!(
                "Activity:          {:.4}x  (volume ratio {})\n",
                report.activity_multiplier, report.transaction_volume_ratio
            ));
            out.push_str(&format!(
                "Decentralization:  {:.4}x  ({} unique miners)\n",
                report.decentralization_multiplier, report.unique_miner_count
            ));
            println!("{}", out);
        }

        Commands::Project { years } => {
            let live = source.fetch().await?;
            let years = years.unwrap_or(config.projection_years);
            let result = compute_issuance(&live.snapshot, &params);
            let points = supply_projection(
                live.snapshot.issued_supply,
                result.annual_issuance,
                years,
                params.max_supply,
            );

            if cli.json {
                return print_json(&points);
            }
            render_live_header(&live, source.as_ref());
            let mut out = String::new();
            render::projection(&mut out, &points, params.max_supply);
            out.push_str(&format!(
                "\nYears to cap: {}\n",
                render::fmt_years(result.years_to_cap)
            ));
            println!("{}", out);
        }

        Commands::Readiness { boost } => {
            let live = source.fetch().await?;
            let gates = gate_readiness(&live.gates, live.snapshot.mempool_fullness_pct, boost);

            if cli.json {
                return print_json(&gates);
            }
            render_live_header(&live, source.as_ref());
            let mut out = String::new();
            render::gates(&mut out, &gates);
            println!("{}", out);
        }

        Commands::Scenario {
            preset,
            compare,
            overrides,
        } => {
            let live = source.fetch().await?;
            let mut context = LabContext::new(&config);
            context.apply_live(live);

            if let Some(compare) = compare {
                context.apply_preset(compare);
                context.pin();
                context.reset_to_live();
            }
            if let Some(preset) = preset {
                context.apply_preset(preset);
            }
            for edit in overrides.edits() {
                context.apply_edit(edit);
            }

            let report = context
                .report()
                .ok_or("no live snapshot to compare against")?;
            if cli.json {
                return print_json(&report);
            }
            println!("{}", render::report(&report, params.max_supply));
        }

        Commands::Watch { preset } => {
            watch(&config, source, preset, cli.json, &params).await?;
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct MultiplierReport {
    transaction_volume_ratio: f64,
    activity_multiplier: f64,
    unique_miner_count: u64,
    decentralization_multiplier: f64,
}

fn load_config(cli: &Cli) -> CliResult<LabConfig> {
    let path = cli.config.clone().unwrap_or_else(LabConfig::default_path);
    let mut config = match &cli.config {
        // An explicit path must exist
        Some(_) => LabConfig::load(&path)?,
        None => LabConfig::load_or_default(&path)?,
    };
    if let Some(api) = &cli.api {
        config.api_base = api.trim_end_matches('/').to_string();
        config.validate()?;
    }
    Ok(config)
}

fn build_source(cli: &Cli, config: &LabConfig) -> CliResult<Arc<dyn SnapshotSource>> {
    if cli.mock {
        return Ok(Arc::new(StaticSource::mock_baseline()));
    }
    let client = RpcClient::new(config)?;
    Ok(Arc::new(RpcSnapshotSource::new(client)))
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_live_header(live: &LiveData, source: &dyn SnapshotSource) {
    println!(
        "{} {} · height {} · captured {}",
        "📡".cyan(),
        source.describe().bright_black(),
        live.snapshot.block_height,
        live.captured_at.format("%H:%M:%S UTC")
    );
}

async fn watch(
    config: &LabConfig,
    source: Arc<dyn SnapshotSource>,
    preset: Option<Preset>,
    json: bool,
    params: &EconomicsParams,
) -> CliResult<()> {
    let mut session = LabSession::new(config);

    // Seed synchronously so a dead node fails loudly instead of drawing nothing
    session.refresh(source.as_ref()).await?;
    if let Some(preset) = preset {
        session.apply_preset(preset).await;
    }

    let mut reports = session.subscribe();
    reports.mark_changed();
    let poller = session.spawn_poller(source.clone(), config.poll_interval());
    log::info!("Watching {} (Ctrl-C to stop)", source.describe());

    loop {
        tokio::select! {
            changed = reports.changed() => {
                if changed.is_err() {
                    break;
                }
                let report = reports.borrow_and_update().clone();
                let Some(report) = report else { continue };

                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
                    println!("{}", render::report(&report, params.max_supply));
                    println!("{}", "Ctrl-C to exit".bright_black());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watch");
                break;
            }
        }
    }

    poller.abort();
    Ok(())
}
