use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use euchre_core::game::game_state::Game;
use euchre_core::game::record::RoundRecord;
use euchre_core::model::card::Card;
use euchre_core::model::player::{Player, PlayerId, Team};
use euchre_core::sim::SimulationResults;
use euchre_core::sim::games::GameSeriesResults;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

const CONFIDENCE_LEVEL: f64 = 0.95;
const FALLBACK_Z: f64 = 1.96;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_error(context: &'static str) -> impl FnOnce(std::io::Error) -> ReportError {
    move |source| ReportError::Io { context, source }
}

/// Two decimal places, as shown to users.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normal-approximation interval for a proportion, clamped to `[0, 1]`.
pub fn proportion_ci95(successes: u32, trials: u32) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 0.0);
    }
    let n = f64::from(trials);
    let p = f64::from(successes) / n;
    let z = Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
        .unwrap_or(FALLBACK_Z);
    let margin = z * (p * (1.0 - p) / n).sqrt();
    ((p - margin).max(0.0), (p + margin).min(1.0))
}

/// Member names joined with " & ", indexed by team.
pub fn team_names(players: &[Player]) -> [String; 2] {
    Team::ALL.map(|team| {
        players
            .iter()
            .filter(|player| player.team() == team)
            .map(|player| player.name.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team: Team,
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub avg_points: f64,
    pub win_probability: f64,
    pub win_ci95: (f64, f64),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub tricks: u32,
    pub avg_tricks: f64,
}

/// Per-trial averages for a round simulation.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub run_id: String,
    pub trials: u32,
    pub flipped_card: Card,
    pub teams: Vec<TeamReport>,
    pub players: Vec<PlayerReport>,
    pub win_prob_map: BTreeMap<String, f64>,
    pub avg_points_map: BTreeMap<String, f64>,
    pub avg_tricks_map: BTreeMap<String, f64>,
}

impl RoundReport {
    pub fn build(run_id: &str, results: &SimulationResults) -> Self {
        let totals = &results.totals;
        let names = team_names(&results.players);

        let teams: Vec<TeamReport> = Team::ALL
            .into_iter()
            .map(|team| {
                let ci = proportion_ci95(totals.wins.get(team), totals.trials);
                TeamReport {
                    team,
                    name: names[team.index()].clone(),
                    points: totals.points.get(team),
                    wins: totals.wins.get(team),
                    avg_points: round2(totals.mean_points(team)),
                    win_probability: round2(totals.win_rate(team)),
                    win_ci95: (round2(ci.0), round2(ci.1)),
                }
            })
            .collect();

        let players: Vec<PlayerReport> = results
            .players
            .iter()
            .map(|player| PlayerReport {
                id: player.id,
                name: player.name.clone(),
                team: player.team(),
                tricks: totals.tricks.get(player.id),
                avg_tricks: round2(totals.mean_tricks(player.id)),
            })
            .collect();

        Self {
            run_id: run_id.to_string(),
            trials: totals.trials,
            flipped_card: results.flipped_card,
            win_prob_map: teams
                .iter()
                .map(|team| (team.name.clone(), team.win_probability))
                .collect(),
            avg_points_map: teams
                .iter()
                .map(|team| (team.name.clone(), team.avg_points))
                .collect(),
            avg_tricks_map: players
                .iter()
                .map(|player| (player.name.clone(), player.avg_tricks))
                .collect(),
            teams,
            players,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).map_err(io_error("writing summary json"))
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let mut rows = String::new();
        rows.push_str("# Round Simulation Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} trials, flipped card {}\n\n",
            self.run_id,
            self.trials,
            self.flipped_card.name()
        ));
        rows.push_str("| Team | Players | Avg Points | Win % | 95% CI |\n");
        rows.push_str("|------|---------|------------|-------|--------|\n");
        for team in &self.teams {
            rows.push_str(&format!(
                "| {team} | {name} | {avg:.2} | {win:.1}% | [{low:.2}, {high:.2}] |\n",
                team = team.team,
                name = team.name,
                avg = team.avg_points,
                win = team.win_probability * 100.0,
                low = team.win_ci95.0,
                high = team.win_ci95.1,
            ));
        }

        rows.push_str("\n| Seat | Player | Team | Avg Tricks |\n");
        rows.push_str("|------|--------|------|------------|\n");
        for player in &self.players {
            rows.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                player.id, player.name, player.team, player.avg_tricks
            ));
        }

        fs::write(path.as_ref(), rows).map_err(io_error("writing summary markdown"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameTeamReport {
    pub team: Team,
    pub name: String,
    pub wins: u32,
    pub points: u32,
    pub win_rate: f64,
    pub win_ci95: (f64, f64),
}

/// Win rates over a series of full games.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    pub run_id: String,
    pub games: u32,
    pub total_rounds: u32,
    pub avg_rounds: f64,
    pub teams: Vec<GameTeamReport>,
}

impl GameReport {
    pub fn build(run_id: &str, players: &[Player], results: &GameSeriesResults) -> Self {
        let totals = &results.totals;
        let names = team_names(players);
        let teams = Team::ALL
            .into_iter()
            .map(|team| {
                let ci = proportion_ci95(totals.wins.get(team), totals.games);
                GameTeamReport {
                    team,
                    name: names[team.index()].clone(),
                    wins: totals.wins.get(team),
                    points: totals.points.get(team),
                    win_rate: round2(totals.win_rate(team)),
                    win_ci95: (round2(ci.0), round2(ci.1)),
                }
            })
            .collect();

        Self {
            run_id: run_id.to_string(),
            games: totals.games,
            total_rounds: totals.rounds,
            avg_rounds: round2(totals.mean_rounds()),
            teams,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).map_err(io_error("writing summary json"))
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let mut rows = String::new();
        rows.push_str("# Game Simulation Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} games, {:.2} rounds per game\n\n",
            self.run_id, self.games, self.avg_rounds
        ));
        rows.push_str("| Team | Players | Wins | Win % | 95% CI |\n");
        rows.push_str("|------|---------|------|-------|--------|\n");
        for team in &self.teams {
            rows.push_str(&format!(
                "| {} | {} | {} | {:.1}% | [{:.2}, {:.2}] |\n",
                team.team,
                team.name,
                team.wins,
                team.win_rate * 100.0,
                team.win_ci95.0,
                team.win_ci95.1
            ));
        }
        fs::write(path.as_ref(), rows).map_err(io_error("writing summary markdown"))
    }
}

/// One JSON object per line.
pub fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<usize, ReportError> {
    let file = File::create(path.as_ref()).map_err(io_error("creating jsonl output"))?;
    let mut writer = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer
            .write_all(b"\n")
            .map_err(io_error("writing jsonl output"))?;
    }
    writer.flush().map_err(io_error("flushing jsonl output"))?;
    Ok(rows.len())
}

pub fn write_rounds(path: impl AsRef<Path>, rounds: &[RoundRecord]) -> Result<usize, ReportError> {
    write_jsonl(path, rounds)
}

pub fn write_games(path: impl AsRef<Path>, games: &[Game]) -> Result<usize, ReportError> {
    write_jsonl(path, games)
}
