pub mod alerts;
pub mod commands;
pub mod config;
pub mod evaluation;
pub mod models;
pub mod periodization;
pub mod session_count;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run() -> anyhow::Result<()> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let cli = commands::Cli::parse();
  commands::dispatch(cli)
}
