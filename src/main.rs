//! Fleetmetrics CLI - field entry and reporting for heavy-equipment metrics.
//!
//! # Usage
//! ```sh
//! fleetmetrics add-productivity --supervisor-name "Budi Santoso" --supervisor-id 880123 \
//!     --excavator-id EX2001 --trip-count 10 --meter-start 100 --meter-end 105 \
//!     --bucket-capacity 6.5
//! fleetmetrics stats --excavator EX2001
//! fleetmetrics export --out backups/
//! ```
//!
//! # Environment Variables
//! - `FLEETMETRICS_DATA_DIR` - Data directory (default: ~/.fleetmetrics)
//! - `MF_WARN_LOW` / `MF_WARN_HIGH` - Match-factor warn band (default: 0.1 / 2.0)
//! - `MF_OPTIMAL_LOW` / `MF_OPTIMAL_HIGH` - Optimal band (default: 0.5 / 1.5)

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use fleetmetrics::application::service::{EntryOutcome, MetricsService};
use fleetmetrics::config::AppConfig;
use fleetmetrics::domain::factory::{MatchFactorInput, ProductivityInput};
use fleetmetrics::domain::record::RecordId;
use std::fs;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "fleetmetrics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecordKind {
    Productivity,
    MatchFactor,
}

#[derive(Subcommand)]
enum Command {
    /// Record an excavator productivity measurement
    AddProductivity {
        #[arg(long)]
        supervisor_name: String,
        #[arg(long)]
        supervisor_id: String,
        #[arg(long)]
        excavator_id: String,
        #[arg(long)]
        trip_count: String,
        #[arg(long)]
        meter_start: String,
        #[arg(long)]
        meter_end: String,
        #[arg(long)]
        bucket_capacity: String,
        /// RFC3339 timestamp; defaults to now at minute precision
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Record a loader/hauler match-factor measurement
    AddMatchFactor {
        #[arg(long)]
        supervisor_name: String,
        #[arg(long)]
        supervisor_id: String,
        #[arg(long)]
        excavator_id: String,
        #[arg(long)]
        hauler_count: String,
        #[arg(long)]
        loader_cycle_time: String,
        #[arg(long)]
        hauler_cycle_time: String,
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Print stored records as JSON
    List {
        #[arg(long, value_enum)]
        kind: Option<RecordKind>,
    },
    /// Summary statistics, fleet-wide or per excavator
    Stats {
        #[arg(long)]
        excavator: Option<String>,
    },
    /// Delete a record by id
    Remove {
        #[arg(long, value_enum)]
        kind: RecordKind,
        #[arg(long)]
        id: RecordId,
    },
    /// Write a full backup snapshot
    Export {
        /// Directory for the snapshot file (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the entire store with a backup snapshot
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let mut service = MetricsService::new(config)?;

    match cli.command {
        Command::AddProductivity {
            supervisor_name,
            supervisor_id,
            excavator_id,
            trip_count,
            meter_start,
            meter_end,
            bucket_capacity,
            timestamp,
        } => {
            let input = ProductivityInput {
                supervisor_name,
                supervisor_id,
                timestamp,
                excavator_id,
                trip_count,
                meter_start,
                meter_end,
                bucket_capacity,
            };
            report_outcome(service.add_productivity(&input)?)?;
        }
        Command::AddMatchFactor {
            supervisor_name,
            supervisor_id,
            excavator_id,
            hauler_count,
            loader_cycle_time,
            hauler_cycle_time,
            timestamp,
        } => {
            let input = MatchFactorInput {
                supervisor_name,
                supervisor_id,
                timestamp,
                excavator_id,
                hauler_count,
                loader_cycle_time,
                hauler_cycle_time,
            };
            report_outcome(service.add_match_factor(&input)?)?;
        }
        Command::List { kind } => {
            let show_prod = !matches!(kind, Some(RecordKind::MatchFactor));
            let show_mf = !matches!(kind, Some(RecordKind::Productivity));
            if show_prod {
                println!(
                    "{}",
                    serde_json::to_string_pretty(service.productivity_records())?
                );
            }
            if show_mf {
                println!(
                    "{}",
                    serde_json::to_string_pretty(service.match_factor_records())?
                );
            }
        }
        Command::Stats { excavator } => match excavator {
            Some(id) => {
                let summary = service.equipment_summary(&id);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            None => {
                println!(
                    "Productivity: {}",
                    serde_json::to_string(&service.productivity_summary())?
                );
                println!(
                    "Match factor: {}",
                    serde_json::to_string(&service.match_factor_summary())?
                );
                match service.fleet_status() {
                    Some(status) => println!("Fleet status: {}", status.as_str()),
                    None => println!("Fleet status: n/a (no match-factor records)"),
                }
            }
        },
        Command::Remove { kind, id } => {
            let removed = match kind {
                RecordKind::Productivity => service.remove_productivity(id)?,
                RecordKind::MatchFactor => service.remove_match_factor(id)?,
            };
            if removed {
                info!("Removed record {}", id);
            } else {
                bail!("No record with id {}", id);
            }
        }
        Command::Export { out } => {
            let (json, filename) = service.export_backup()?;
            let path = out.unwrap_or_else(|| PathBuf::from(".")).join(filename);
            fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Backup written to {:?}", path);
        }
        Command::Import { file } => {
            let raw =
                fs::read_to_string(&file).with_context(|| format!("Failed to read {:?}", file))?;
            let (prods, mfs) = service.import_backup(&raw)?;
            info!(
                "Restored {} productivity and {} match-factor records",
                prods, mfs
            );
        }
    }

    Ok(())
}

fn report_outcome<R: serde::Serialize>(outcome: EntryOutcome<R>) -> Result<()> {
    match outcome {
        EntryOutcome::Saved { record, warnings } => {
            for warning in warnings {
                warn!("{}", warning);
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        EntryOutcome::Rejected(report) => {
            bail!("Validation failed:\n  {}", report.errors.join("\n  "));
        }
        EntryOutcome::NotFound => bail!("Record no longer exists"),
    }
}
