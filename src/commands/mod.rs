pub mod config;
pub mod cycle;
pub mod status;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::models::Lift;

#[derive(Parser)]
#[command(name = "forzudo", about = "5/3/1 periodization engine", version)]
pub struct Cli {
  /// Program TOML file (overrides FORZUDO_CONFIG env var)
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Evaluate the full training state: cycle, next session, alerts
  Status {
    /// JSON array of logged sessions
    #[arg(long, env = "FORZUDO_SESSIONS")]
    sessions: Option<PathBuf>,
    /// Evaluation time as RFC3339 (defaults to now)
    #[arg(long)]
    now: Option<String>,
    /// Derive the cycle from the calendar even when a log is given
    #[arg(long)]
    estimate: bool,
  },
  /// Show the cycle position after N completed sessions
  Cycle {
    /// Completed sessions since program start
    #[arg(long, allow_negative_numbers = true)]
    sessions_count: i64,
  },
  /// Plan a training day
  Plan {
    /// Day of the microcycle, 1-4 (defaults to the next day due)
    #[arg(long)]
    day: Option<u8>,
    /// Completed sessions (defaults to the calendar estimate)
    #[arg(long, allow_negative_numbers = true)]
    sessions_count: Option<i64>,
    /// Plan the first configured day instead of failing on an unknown --day
    #[arg(long)]
    fallback_day: bool,
  },
  /// Project working weights for a lift and week type
  Weights {
    /// ohp, deadlift, bench or squat
    #[arg(long)]
    lift: Lift,
    /// Week type, 1-4
    #[arg(long)]
    week: u8,
    /// Training max bumps already applied
    #[arg(long, default_value_t = 0)]
    bumps: u64,
  },
  /// Validate the loaded program and print a summary
  CheckConfig,
}

/// Load the program and run the selected command
pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
  let program = crate::config::load_program(cli.config.as_deref())
    .context("Failed to load program config")?;

  match cli.command {
    Commands::Status {
      sessions,
      now,
      estimate,
    } => status::run_status(&program, sessions.as_deref(), now.as_deref(), estimate),
    Commands::Cycle { sessions_count } => cycle::run_cycle(&program, sessions_count),
    Commands::Plan {
      day,
      sessions_count,
      fallback_day,
    } => cycle::run_plan(&program, day, sessions_count, fallback_day),
    Commands::Weights { lift, week, bumps } => cycle::run_weights(&program, lift, week, bumps),
    Commands::CheckConfig => config::run_check_config(&program),
  }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
  println!("{}", json);
  Ok(())
}
