//! Single-shot evaluation of the whole training picture.
//!
//! [`evaluate`] takes the program, the clock, the session log and a session
//! count source, and returns one self-contained [`Evaluation`] value. Nothing
//! is cached between calls; the same inputs always serialize to the same JSON.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::alerts::{evaluate_alerts, hours_since, Alert};
use crate::models::{ProgramConfig, Session};
use crate::periodization::{next_day, CycleState, EngineError, NextSessionPlan};
use crate::session_count::SessionCountSource;

/// Days looked ahead when listing upcoming sessions
const UPCOMING_DAYS: i64 = 7;
/// Window for the volume total
const VOLUME_WINDOW_DAYS: i64 = 30;
/// Window for counting streak days
const STREAK_WINDOW_DAYS: i64 = 7;

/// ---------------------------------------------------------------------------
/// Output Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingSession {
  pub date: NaiveDate,
  #[serde(flatten)]
  pub plan: NextSessionPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStats {
  /// Session count the cycle position was derived from
  pub total_sessions: u64,
  /// Volume logged in the last 30 days
  pub total_volume: f64,
  pub current_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
  pub generated_at: DateTime<Utc>,
  pub cycle: CycleState,
  pub next_session: NextSessionPlan,
  pub last_session: Option<Session>,
  pub hours_since_last: Option<f64>,
  pub is_deload_week: bool,
  pub days_until_deload: u8,
  pub alerts: Vec<Alert>,
  pub upcoming: Vec<UpcomingSession>,
  pub stats: TrainingStats,
}

/// ---------------------------------------------------------------------------
/// Evaluation
/// ---------------------------------------------------------------------------

pub fn evaluate(
  program: &ProgramConfig,
  now: DateTime<Utc>,
  sessions: &[Session],
  source: &dyn SessionCountSource,
) -> Result<Evaluation, EngineError> {
  let count = source.session_count(now)?;
  let cycle = CycleState::compute(count, program)?;
  let total_sessions =
    u64::try_from(count).map_err(|_| EngineError::NegativeSessionCount(count))?;

  let next_session = NextSessionPlan::build(program, next_day(total_sessions), &cycle)?;

  // Latest by timestamp; on ties the later entry in the log wins
  let last_session = sessions.iter().max_by_key(|s| s.date).cloned();
  let hours_since_last = last_session.as_ref().map(|s| hours_since(s, now));

  let alerts = evaluate_alerts(&cycle, last_session.as_ref(), now, &program.alerts);
  let upcoming = upcoming_sessions(program, &cycle, now.date_naive())?;
  let stats = TrainingStats {
    total_sessions,
    total_volume: volume_within(sessions, now, VOLUME_WINDOW_DAYS),
    current_streak: current_streak(sessions, last_session.as_ref(), now),
  };

  tracing::info!(
    total_sessions,
    macro_num = cycle.macro_num,
    week_in_macro = cycle.week_in_macro,
    alerts = alerts.len(),
    "Evaluated training state"
  );

  Ok(Evaluation {
    generated_at: now,
    is_deload_week: cycle.is_deload_week(),
    days_until_deload: cycle.days_until_deload(),
    cycle,
    next_session,
    last_session,
    hours_since_last,
    alerts,
    upcoming,
    stats,
  })
}

/// Plans for the training days among the next seven calendar days.
/// Monday-Thursday map to days 1-4; the rest of the week is off.
pub fn upcoming_sessions(
  program: &ProgramConfig,
  cycle: &CycleState,
  today: NaiveDate,
) -> Result<Vec<UpcomingSession>, EngineError> {
  let mut upcoming = Vec::new();
  for offset in 0..UPCOMING_DAYS {
    let date = today + Duration::days(offset);
    let weekday = date.weekday().num_days_from_monday();
    if weekday < 4 {
      // Always 1..=4
      let day = weekday as u8 + 1;
      upcoming.push(UpcomingSession {
        date,
        plan: NextSessionPlan::build(program, day, cycle)?,
      });
    }
  }
  Ok(upcoming)
}

fn within_days(session: &Session, now: DateTime<Utc>, days: i64) -> bool {
  session.date <= now && now - session.date < Duration::days(days)
}

fn volume_within(sessions: &[Session], now: DateTime<Utc>, days: i64) -> f64 {
  sessions
    .iter()
    .filter(|s| within_days(s, now, days))
    .map(|s| s.volume)
    .sum()
}

/// Distinct training days in the last week, or 0 once more than a day has
/// passed since the latest session
fn current_streak(sessions: &[Session], last: Option<&Session>, now: DateTime<Utc>) -> u32 {
  let Some(last) = last else {
    return 0;
  };
  if (now - last.date).num_days() > 1 {
    return 0;
  }
  let days: BTreeSet<NaiveDate> = sessions
    .iter()
    .filter(|s| within_days(s, now, STREAK_WINDOW_DAYS))
    .map(|s| s.date.date_naive())
    .collect();
  days.len() as u32
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
