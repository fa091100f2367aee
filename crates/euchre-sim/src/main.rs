use std::path::PathBuf;

use clap::Parser;

use euchre_sim::config::{ResolvedOutputs, SimulationConfig};
use euchre_sim::logging::init_logging;
use euchre_sim::runner::SimulationRunner;

/// Monte Carlo simulator for Euchre rounds and games.
#[derive(Debug, Parser)]
#[command(
    name = "euchre-sim",
    author,
    version,
    about = "Seeded Euchre round and game simulator"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "configs/round.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds (or games) to simulate.
    #[arg(short, long, value_name = "COUNT")]
    quantity: Option<u32>,

    /// Override the RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Write every simulated round to the rounds JSONL output.
    #[arg(long)]
    keep_rounds: bool,

    /// Exit after validating the configuration (nothing is simulated).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(quantity) = cli.quantity {
        config.quantity = quantity;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if cli.keep_rounds {
        config.round.keep_rounds = true;
        config.game.keep_games = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let quantity = config.quantity;
    let mode = config.mode;

    println!("Loaded configuration '{run_id}' ({mode:?} mode, quantity {quantity})");

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SimulationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}' in {:.2?}",
        summary.elapsed
    );
    if let Some(report) = summary.round_report.as_ref() {
        for team in &report.teams {
            println!(
                "  {}: win probability {:.2} [{:.2}, {:.2}], average points {:.2}",
                team.name, team.win_probability, team.win_ci95.0, team.win_ci95.1, team.avg_points
            );
        }
        for player in &report.players {
            println!("  {}: average tricks {:.2}", player.name, player.avg_tricks);
        }
    }
    if let Some(report) = summary.game_report.as_ref() {
        for team in &report.teams {
            println!(
                "  {}: {} wins of {} games ({:.2})",
                team.name, team.wins, report.games, team.win_rate
            );
        }
        println!("  Average rounds per game: {:.2}", report.avg_rounds);
    }
    println!("Summary (JSON): {}", summary.summary_json_path.display());
    println!("Summary (Markdown): {}", summary.summary_md_path.display());
    if let Some(path) = summary.records_path.as_ref() {
        println!(
            "Records: {} rows at {}",
            summary.records_written,
            path.display()
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
