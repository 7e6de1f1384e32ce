//! CLI probe for the graph engine.
//!
//! # Responsibility
//! - Verify `skillgraph_core` linkage with deterministic output.
//! - Render a snapshot for a JSON record file:
//!   `skillgraph_cli <records.json> [seed]`.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skillgraph_core::{
    compute_snapshot, default_log_level, init_logging, EngineConfig, GraphRecords,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug, Clone)]
#[command(name = "skillgraph_cli")]
#[command(about = "Render skill graph snapshots from a JSON record file")]
struct Args {
    /// `GraphRecords` JSON file; without it only the linkage probe runs.
    records: Option<PathBuf>,

    /// Seed for fallback placement of unpositioned nodes.
    #[arg(default_value_t = 7)]
    seed: u64,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "SKILLGRAPH_LOG_DIR")]
    log_dir: Option<String>,

    /// JSON `EngineConfig` override file.
    #[arg(long, env = "SKILLGRAPH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let Some(records) = args.records.as_deref() else {
        println!("skillgraph_core ping={}", skillgraph_core::ping());
        println!("skillgraph_core version={}", skillgraph_core::core_version());
        return ExitCode::SUCCESS;
    };

    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }

    let rendered = load_config(args.config.as_deref())
        .and_then(|config| render(records, args.seed, &config));
    match rendered {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
    EngineConfig::from_json_str(&raw)
        .map_err(|err| format!("config `{}`: {err}", path.display()))
}

fn render(path: &Path, seed: u64, config: &EngineConfig) -> Result<String, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
    let records: GraphRecords = serde_json::from_str(&raw)
        .map_err(|err| format!("invalid records in `{}`: {err}", path.display()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let snapshot = compute_snapshot(&records, &BTreeMap::new(), config, &mut rng);
    log::debug!(
        "event=cli_render module=cli status=ok nodes={} edges={} outlines={}",
        snapshot.nodes.len(),
        snapshot.edges.len(),
        snapshot.outlines.len()
    );
    serde_json::to_string_pretty(&snapshot)
        .map_err(|err| format!("failed to encode snapshot: {err}"))
}
