//! Lineup optimizer CLI
//!
//! Reads a salary CSV, solves the lineup model and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use lineup_ilp::catalog::ingest;
use lineup_ilp::lineup::LineupOptimizer;
use lineup_ilp::model::LineupConfig;
use lineup_ilp::solver::SolverConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "lineup-ilp")]
#[command(about = "Pick the highest-projected fantasy lineup under a salary cap", long_about = None)]
struct Cli {
    /// Player salary CSV (header row, positional columns)
    players: PathBuf,

    /// JSON lineup config; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the salary cap
    #[arg(long)]
    salary_cap: Option<f64>,

    /// Solver time limit in milliseconds
    #[arg(long, default_value_t = 60_000)]
    time_limit_ms: u64,

    /// Print the lineup as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Print the LP model before solving
    #[arg(long)]
    print_model: bool,
}

fn main() -> Result<()> {
    lineup_ilp::logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LineupConfig::default(),
    };
    if let Some(cap) = cli.salary_cap {
        config = config.with_salary_cap(cap);
    }

    let catalog = ingest::read_csv(&cli.players)
        .with_context(|| format!("failed to load players from {}", cli.players.display()))?;

    let solver_config =
        SolverConfig::default().with_time_limit(Duration::from_millis(cli.time_limit_ms));
    let optimizer = LineupOptimizer::new(config).with_solver_config(solver_config);

    if cli.print_model {
        let model = optimizer.build_model(&catalog)?;
        println!("{model}");
    }

    let lineup = optimizer
        .optimize(&catalog)
        .context("lineup optimization failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&lineup)?);
    } else {
        println!("{lineup}");
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<LineupConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}
