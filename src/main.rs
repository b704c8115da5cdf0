//! Roster scheduling CLI.
//!
//! Run with: cargo run --bin roster-cli -- --csv data/persons.csv --locations config/locations.json

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use roster_scheduling::config::SolveConfig;
use roster_scheduling::io::{csv_export, csv_import, json_import};
use roster_scheduling::solve::{self, SolveOutcome};

/// Run roster optimization.
#[derive(Debug, Parser)]
#[command(name = "roster-cli", about = "Shift roster scheduling via a constraint/SAT model")]
struct Cli {
    /// Path to the input CSV with persons and per-date availability.
    #[arg(long, value_name = "PATH")]
    csv: PathBuf,

    /// Path to the location configuration JSON (locations + teams_per_date).
    #[arg(long, value_name = "PATH")]
    locations: PathBuf,

    /// Path to a weights/constraint TOML config (overrides the built-in defaults).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to a mutual-exclusions JSON file (list of `[name_a, name_b]` pairs).
    #[arg(long, value_name = "PATH")]
    exclusions: Option<PathBuf>,

    /// Year used to resolve bare `day-month` availability columns.
    #[arg(long, default_value_t = 2025)]
    year: i32,

    /// Wall-clock solve time limit, in seconds.
    #[arg(long)]
    time_limit_secs: Option<u64>,

    /// Directory filled shifts and penalty CSVs are written to.
    #[arg(long, value_name = "DIR", default_value = "out")]
    out_dir: PathBuf,

    /// Emit debug-level logs.
    #[arg(long)]
    verbose: bool,
}

fn main() -> roster_scheduling::error::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let locations = json_import::import_locations_json(&cli.locations)?;
    let location_names: Vec<String> = locations.iter().map(|l| l.name.clone()).collect();
    let persons = csv_import::import_persons_csv(&cli.csv, &location_names, cli.year)?;

    info!(persons = persons.len(), locations = locations.len(), "loaded input");

    let mut config = match &cli.config {
        Some(path) => SolveConfig::load(path)?,
        None => SolveConfig::default(),
    };
    if let Some(secs) = cli.time_limit_secs {
        config = config.with_time_limit_seconds(secs);
    }

    let exclusion_names = match &cli.exclusions {
        Some(path) => json_import::import_exclusions_json(path)?,
        None => Vec::new(),
    };

    let outcome = solve::solve(persons, locations, &config, &exclusion_names)?;

    std::fs::create_dir_all(&cli.out_dir)?;
    match outcome {
        SolveOutcome::Solved { status, filled_shifts, penalty_breakdown } => {
            info!(?status, shifts = filled_shifts.len(), "solve succeeded");
            csv_export::export_filled_shifts_csv(
                &cli.out_dir.join("filled_shifts.csv"),
                &filled_shifts,
                csv_export::TestersColumnShape::Split,
            )?;
            csv_export::export_penalty_breakdown_csv(
                &cli.out_dir.join("penalties.csv"),
                &penalty_breakdown,
            )?;
            csv_export::export_penalty_summary_csv(
                &cli.out_dir.join("penalties_summary.csv"),
                &penalty_breakdown,
            )?;
            println!("wrote {} filled shifts to {}", filled_shifts.len(), cli.out_dir.display());
        }
        SolveOutcome::Unsolved { status, diagnostics } => {
            warn!(?status, culprits = diagnostics.len(), "no solution found");
            csv_export::export_diagnostics_csv(&cli.out_dir.join("diagnostics.csv"), &diagnostics)?;
            println!(
                "no solution found ({status:?}); wrote {} diagnostic rows to {}",
                diagnostics.len(),
                cli.out_dir.display()
            );
        }
    }

    Ok(())
}
