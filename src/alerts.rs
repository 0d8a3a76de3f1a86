//! Alert evaluation
//!
//! Turns a cycle position and the latest logged session into a short,
//! ordered list of things the lifter should know about. Alerts are rebuilt
//! on every evaluation and carry no identity between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AlertThresholds, Session};
use crate::periodization::CycleState;

/// ---------------------------------------------------------------------------
/// Alert Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
  Success,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertKind {
  DeloadApproaching {
    #[serde(rename = "daysUntilDeload")]
    days_until_deload: u8,
  },
  Inactive {
    #[serde(rename = "hoursSinceLast")]
    hours_since_last: f64,
  },
  DeloadActive,
  AllClear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
  #[serde(rename = "type")]
  pub severity: AlertSeverity,
  pub icon: String,
  pub message: String,
  #[serde(flatten)]
  pub kind: AlertKind,
}

impl Alert {
  fn new(severity: AlertSeverity, icon: &str, message: String, kind: AlertKind) -> Self {
    Self {
      severity,
      icon: icon.to_string(),
      message,
      kind,
    }
  }

  fn deload_approaching(days_until_deload: u8) -> Self {
    let message = match days_until_deload {
      0 => "Deload starts this week".to_string(),
      1 => "Deload in 1 day".to_string(),
      n => format!("Deload in {} days", n),
    };
    Self::new(
      AlertSeverity::Warning,
      "⏰",
      message,
      AlertKind::DeloadApproaching { days_until_deload },
    )
  }

  fn inactive(hours_since_last: f64) -> Self {
    Self::new(
      AlertSeverity::Error,
      "⚠️",
      format!("{:.0}h without training", hours_since_last),
      AlertKind::Inactive { hours_since_last },
    )
  }

  fn deload_active() -> Self {
    Self::new(
      AlertSeverity::Success,
      "🧘",
      "Deload week - recover well".to_string(),
      AlertKind::DeloadActive,
    )
  }

  fn all_clear() -> Self {
    Self::new(
      AlertSeverity::Success,
      "✅",
      "All good, keep lifting".to_string(),
      AlertKind::AllClear,
    )
  }
}

/// Hours between `last` and `now`. Negative if the session is in the future.
pub fn hours_since(last: &Session, now: DateTime<Utc>) -> f64 {
  (now - last.date).num_seconds() as f64 / 3600.0
}

/// ---------------------------------------------------------------------------
/// Evaluation
/// ---------------------------------------------------------------------------

/// Evaluate alerts in fixed order: upcoming deload, inactivity, active deload.
/// When none of those fire, a single all-clear is returned.
///
/// With no logged session at all there is nothing to measure inactivity
/// against, so that alert stays silent.
pub fn evaluate_alerts(
  cycle: &CycleState,
  last_session: Option<&Session>,
  now: DateTime<Utc>,
  thresholds: &AlertThresholds,
) -> Vec<Alert> {
  let mut alerts = Vec::new();

  if cycle.week_in_macro >= thresholds.deload_warning_week {
    alerts.push(Alert::deload_approaching(cycle.days_until_deload()));
  }

  if let Some(last) = last_session {
    let hours = hours_since(last, now);
    if hours > thresholds.inactivity_hours {
      alerts.push(Alert::inactive(hours));
    }
  }

  if cycle.is_deload_week() {
    alerts.push(Alert::deload_active());
  }

  if alerts.is_empty() {
    alerts.push(Alert::all_clear());
  }

  tracing::debug!(count = alerts.len(), "Evaluated alerts");
  alerts
}
