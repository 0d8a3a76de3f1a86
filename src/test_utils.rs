//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories
//! - Fixed clocks and time helpers
//! - Helper assertions

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{ProgramConfig, RawSession, Session};

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Monday 2026-03-30 20:00 UTC, 38 days into the default program
/// (5 full weeks, so week 6 of the first macro)
pub fn fixed_now() -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2026, 3, 30, 20, 0, 0)
    .single()
    .expect("valid fixed clock")
}

/// Create a DateTime N hours before `now`
pub fn hours_before(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
  now - Duration::hours(hours)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// The default program, validated
pub fn mock_program() -> ProgramConfig {
  let program = ProgramConfig::default();
  program.validate().expect("default program should be valid");
  program
}

/// Create a session logged `hours_ago` hours before `now`
pub fn mock_session(exercise: &str, hours_ago: i64, now: DateTime<Utc>) -> Session {
  Session {
    exercise: exercise.to_string(),
    date: hours_before(now, hours_ago),
    day_label: String::new(),
    week: 1,
    top_weight: 60.0,
    reps: "5/5/5".to_string(),
    volume: 1500.0,
  }
}

/// Create a raw store entry for the given timestamp string
pub fn mock_raw_session(exercise: &str, date: &str) -> RawSession {
  RawSession {
    exercise: Some(exercise.to_string()),
    date: Some(date.to_string()),
    day_label: None,
    week: Some(1.0),
    top_weight: Some(60.0),
    reps: Some("5/5/5".to_string()),
    volume: Some(1500.0),
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let now = fixed_now();
    let session = mock_session("Bench Press", 5, now);
    assert_eq!(session.exercise, "Bench Press");
    assert_eq!((now - session.date).num_hours(), 5);

    let raw = mock_raw_session("Squat", "2026-03-01");
    assert!(Session::try_from(raw).is_ok());

    assert_eq!(mock_program().days.len(), 4);
  }

  #[test]
  fn test_fixed_now_is_a_monday() {
    use chrono::{Datelike, Weekday};
    assert_eq!(fixed_now().weekday(), Weekday::Mon);
  }
}
