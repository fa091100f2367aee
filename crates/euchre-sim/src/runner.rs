use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use euchre_core::sim::games::{GameSimulation, simulate_games};
use euchre_core::sim::{RoundSimulation, SimulationError, simulate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, RunMode, SimulationConfig, ValidationError};
use crate::report::{GameReport, ReportError, RoundReport, write_games, write_rounds};

/// Validated request ready to hand to the engine.
enum Request {
    Rounds(RoundSimulation),
    Games(GameSimulation),
}

/// Primary entry point for running a configured simulation.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    request: Request,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub mode: RunMode,
    pub quantity: u32,
    pub seed: Option<u64>,
    pub summary_json_path: PathBuf,
    pub summary_md_path: PathBuf,
    pub records_path: Option<PathBuf>,
    pub records_written: usize,
    pub elapsed: Duration,
    pub round_report: Option<RoundReport>,
    pub game_report: Option<GameReport>,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("simulation aborted: {0}")]
    Simulation(#[from] SimulationError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let request = match config.mode {
            RunMode::Round => Request::Rounds(config.round_simulation()?),
            RunMode::Game => Request::Games(config.game_simulation()?),
        };
        Ok(Self {
            config,
            outputs,
            request,
        })
    }

    /// Run the simulation and write every report.
    pub fn run(self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.summary_json.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let run_id = self.config.run_id.as_str();
        let started = Instant::now();

        event!(
            target: "euchre_sim::run",
            Level::INFO,
            run_id,
            mode = ?self.config.mode,
            quantity = self.config.quantity,
            seed = ?self.config.seed,
            "simulation started"
        );

        let mut summary = RunSummary {
            mode: self.config.mode,
            quantity: self.config.quantity,
            seed: self.config.seed,
            summary_json_path: self.outputs.summary_json.clone(),
            summary_md_path: self.outputs.summary_md.clone(),
            records_path: None,
            records_written: 0,
            elapsed: Duration::ZERO,
            round_report: None,
            game_report: None,
        };

        match self.request {
            Request::Rounds(request) => {
                let keep_rounds = request.keep_rounds;
                let results = simulate(request, &mut rng)?;
                let report = RoundReport::build(run_id, &results);
                report.write_json(&self.outputs.summary_json)?;
                report.write_markdown(&self.outputs.summary_md)?;

                if keep_rounds {
                    let path = &self.outputs.rounds_jsonl;
                    ensure_parent(path.parent())?;
                    summary.records_written = write_rounds(path, &results.rounds)?;
                    summary.records_path = Some(path.clone());
                }
                summary.round_report = Some(report);
            }
            Request::Games(request) => {
                let players = request.players.clone();
                let keep_games = request.keep_games;
                let results = simulate_games(request, &mut rng)?;
                let report = GameReport::build(run_id, &players, &results);
                report.write_json(&self.outputs.summary_json)?;
                report.write_markdown(&self.outputs.summary_md)?;

                if keep_games {
                    let path = &self.outputs.games_jsonl;
                    ensure_parent(path.parent())?;
                    summary.records_written = write_games(path, &results.games)?;
                    summary.records_path = Some(path.clone());
                }
                summary.game_report = Some(report);
            }
        }

        summary.elapsed = started.elapsed();
        event!(
            target: "euchre_sim::run",
            Level::INFO,
            run_id,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            records = summary.records_written,
            "simulation finished"
        );
        Ok(summary)
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
