//! `forzudo status` command: evaluate the whole training state as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::evaluation::{evaluate, Evaluation};
use crate::models::{parse_timestamp, ProgramConfig, RawSession, Session};
use crate::session_count::{CalendarEstimate, LoggedSessions, SessionCountSource};

/// Run the status command.
pub fn run_status(
  program: &ProgramConfig,
  sessions_path: Option<&Path>,
  now: Option<&str>,
  estimate: bool,
) -> Result<()> {
  let evaluation = build_status(program, sessions_path, now, estimate)?;
  super::print_json(&evaluation)
}

/// Evaluate against the log at `sessions_path`. The cycle position comes from
/// the logged training days unless `estimate` is set or no log is given.
pub fn build_status(
  program: &ProgramConfig,
  sessions_path: Option<&Path>,
  now: Option<&str>,
  estimate: bool,
) -> Result<Evaluation> {
  let now = resolve_now(now)?;
  let sessions = match sessions_path {
    Some(path) => load_sessions(path)?,
    None => Vec::new(),
  };

  let calendar = CalendarEstimate {
    program_start: program.program_start,
  };
  let logged = LoggedSessions {
    program_start: program.program_start,
    sessions: &sessions,
  };
  let source: &dyn SessionCountSource = if estimate || sessions_path.is_none() {
    tracing::debug!("Using calendar estimate for session count");
    &calendar
  } else {
    tracing::debug!(logged = sessions.len(), "Using session log for session count");
    &logged
  };

  evaluate(program, now, &sessions, source).context("Failed to evaluate training state")
}

/// Read a JSON array of session records
pub fn load_sessions(path: &Path) -> Result<Vec<Session>> {
  let contents = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read sessions file {}", path.display()))?;
  let raw: Vec<RawSession> = serde_json::from_str(&contents)
    .with_context(|| format!("Failed to parse sessions file {}", path.display()))?;
  let sessions = Session::parse_log(raw)
    .with_context(|| format!("Invalid session in {}", path.display()))?;
  Ok(sessions)
}

fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
  match now {
    Some(value) => {
      parse_timestamp(value).map_err(|e| anyhow::anyhow!("Invalid --now value {value:?}: {e}"))
    }
    None => Ok(Utc::now()),
  }
}
