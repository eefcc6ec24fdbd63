// Season report entry point.
//
// This binary is a thin caller around the engine: flag parsing, report
// rendering, and path wiring live here; every computation is a library
// call. Startup sequence:
// 1. Initialize tracing (stderr, env-filtered)
// 2. Parse arguments, load config
// 3. Ingest the CSV table(s) the chosen report needs
// 4. Filter / rank / persist through the library
// 5. Print a plain-text report

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use puckboard::config;
use puckboard::filter;
use puckboard::ingest::{self, LoadReport};
use puckboard::rank;
use puckboard::roster::RosterEntity;
use puckboard::store::SnapshotStore;

#[derive(Debug, Parser)]
#[command(version, about = "Season statistics reports for skaters and goalies")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Top skaters by points.
    TopScorers {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Top goalies by save percentage.
    Goalies {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Every skater and goalie on one team.
    Team {
        /// Team code, e.g. BOS.
        code: String,
    },
    /// Top skaters by hits.
    Hitters {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Top skaters by penalty minutes.
    PenaltyMinutes {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Write a snapshot of every ingested entity to the database.
    Export,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = config::load_config_from(Path::new(&args.config))
        .context("failed to load configuration")?;

    match args.command {
        Command::TopScorers { limit } => {
            let skaters = ingest_table(&config.data.skaters, ingest::load_skaters)?;
            let ranked = rank::top_n(&skaters, "points", limit)?;
            println!("Top Point Scorers");
            print_skater_table(&ranked);
        }
        Command::Goalies { limit } => {
            let goalies = ingest_table(&config.data.goalies, ingest::load_goalies)?;
            let ranked = rank::top_n(&goalies, "save_percentage", limit)?;
            println!("Top Goalies by Save Percentage");
            print_goalie_table(&ranked);
        }
        Command::Team { code } => {
            let skaters = ingest_table(&config.data.skaters, ingest::load_skaters)?;
            let goalies = ingest_table(&config.data.goalies, ingest::load_goalies)?;

            let team_skaters = filter::by_team(&skaters, &code);
            let team_goalies = filter::by_team(&goalies, &code);

            println!("Skaters from {code}:");
            if team_skaters.is_empty() {
                println!("  (none)");
            } else {
                print_skater_table(&team_skaters);
            }
            println!();
            println!("Goalies from {code}:");
            if team_goalies.is_empty() {
                println!("  (none)");
            } else {
                print_goalie_table(&team_goalies);
            }
        }
        Command::Hitters { limit } => {
            let skaters = ingest_table(&config.data.skaters, ingest::load_skaters)?;
            let ranked = rank::top_n(&skaters, "hits", limit)?;
            println!("Top Hitters");
            print_skater_table(&ranked);
        }
        Command::PenaltyMinutes { limit } => {
            let skaters = ingest_table(&config.data.skaters, ingest::load_skaters)?;
            let ranked = rank::top_n(&skaters, "penalty_minutes", limit)?;
            println!("Highest Penalty Minutes");
            print_skater_table(&ranked);
        }
        Command::Export => {
            let mut entities = ingest_table(&config.data.skaters, ingest::load_skaters)?;
            entities.extend(ingest_table(&config.data.goalies, ingest::load_goalies)?);

            let mut store = SnapshotStore::open(&config.database.path)
                .context("failed to open snapshot store")?;
            let written = store.save(&entities).context("failed to save snapshot")?;
            info!("snapshot committed");
            println!("Wrote {written} rows to {}", config.database.path);
        }
    }

    Ok(())
}

/// Ingest one CSV table. Malformed rows are reported in full and the valid
/// rows proceed; only a schema-level problem aborts the report.
fn ingest_table(
    path: &str,
    loader: fn(&Path) -> Result<LoadReport, ingest::IngestError>,
) -> anyhow::Result<Vec<RosterEntity>> {
    let report = loader(Path::new(path)).with_context(|| format!("failed to ingest {path}"))?;
    for error in &report.row_errors {
        warn!("{path}: {error}");
    }
    if !report.row_errors.is_empty() {
        warn!(
            "{path}: skipped {} malformed row(s), continuing with {} valid",
            report.row_errors.len(),
            report.entities.len()
        );
    }
    Ok(report.entities)
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

fn print_skater_table(entities: &[RosterEntity]) {
    println!(
        "  {:<24} {:<6} {:<8} {:>3} {:>3} {:>4} {:>5} {:>5}",
        "NAME", "TEAM", "POS", "G", "A", "PTS", "PIM", "HITS"
    );
    for entity in entities {
        let Some(skater) = entity.as_skater() else {
            continue;
        };
        let team = filter::resolve_team_code(entity).unwrap_or_else(|| skater.team.clone());
        println!(
            "  {:<24} {:<6} {:<8} {:>3} {:>3} {:>4} {:>5} {:>5}",
            skater.name,
            team,
            skater.position,
            skater.goals,
            skater.assists,
            skater.points(),
            skater.penalty_minutes,
            skater
                .hits
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}

fn print_goalie_table(entities: &[RosterEntity]) {
    println!(
        "  {:<24} {:<6} {:>5} {:>5} {:>6}",
        "NAME", "TEAM", "SV", "SA", "SV%"
    );
    for entity in entities {
        let Some(goalie) = entity.as_goalie() else {
            continue;
        };
        let team = filter::resolve_team_code(entity).unwrap_or_else(|| goalie.team.clone());
        println!(
            "  {:<24} {:<6} {:>5} {:>5} {:>6}",
            goalie.name,
            team,
            goalie.saves,
            goalie.shots_against,
            goalie
                .save_percentage()
                .map(|pct| format!("{pct:.3}"))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}

/// Initialize tracing to stderr so reports on stdout stay clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("puckboard=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
