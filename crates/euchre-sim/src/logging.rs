use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

const TELEMETRY_FILE: &str = "telemetry.jsonl";
const LOGGED_CRATES: [&str; 2] = ["euchre_core", "euchre_sim"];

/// Keeps the background writer alive; events are flushed when this drops.
pub struct LoggingGuard {
    _worker: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// The JSON event log sits beside the summary JSON.
pub fn telemetry_path(outputs: &ResolvedOutputs) -> PathBuf {
    outputs
        .summary_json
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        .join(TELEMETRY_FILE)
}

/// Engine and runner events at `level`; `RUST_LOG` wins when set.
fn simulation_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = LOGGED_CRATES
            .iter()
            .map(|target| format!("{target}={}", level.as_str()))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    })
}

/// Installs the JSON subscriber for a run. `None` when structured logging is off.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = telemetry_path(outputs);
    if let Some(dir) = telemetry_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;
    let (writer, worker) = NonBlockingBuilder::default().lossy(false).finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(simulation_filter(logging.level().unwrap_or(Level::INFO)))
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // Tests may have installed one already.
    let _ = tracing::subscriber::set_global_default(subscriber);
    tracing::info!(
        target: "euchre_sim::run",
        run_id,
        telemetry = %telemetry_path.display(),
        "structured logging enabled"
    );

    Ok(Some(LoggingGuard {
        _worker: worker,
        telemetry_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::telemetry_path;
    use crate::config::ResolvedOutputs;
    use std::path::PathBuf;

    fn outputs(summary_json: &str) -> ResolvedOutputs {
        ResolvedOutputs {
            summary_json: PathBuf::from(summary_json),
            summary_md: PathBuf::from("summary.md"),
            rounds_jsonl: PathBuf::from("rounds.jsonl"),
            games_jsonl: PathBuf::from("games.jsonl"),
        }
    }

    #[test]
    fn telemetry_lands_next_to_the_summary() {
        assert_eq!(
            telemetry_path(&outputs("out/run_7/summary.json")),
            PathBuf::from("out/run_7/telemetry.jsonl")
        );
        assert_eq!(
            telemetry_path(&outputs("summary.json")),
            PathBuf::from("./telemetry.jsonl")
        );
    }
}
