use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::ConfigError;

/// Day indices a microcycle rotates through
pub const MICROCYCLE_DAYS: std::ops::RangeInclusive<u8> = 1..=4;

/// Week-type indices the cycle calculator can produce (4 = deload)
pub const WEEK_TYPES: std::ops::RangeInclusive<u8> = 1..=4;

/// ---------------------------------------------------------------------------
/// Lifts
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lift {
  Ohp,
  Deadlift,
  Bench,
  Squat,
}

impl Lift {
  pub fn as_str(&self) -> &'static str {
    match self {
      Lift::Ohp => "ohp",
      Lift::Deadlift => "deadlift",
      Lift::Bench => "bench",
      Lift::Squat => "squat",
    }
  }
}

impl std::fmt::Display for Lift {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Lift {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "ohp" | "press" | "overhead_press" => Ok(Self::Ohp),
      "deadlift" => Ok(Self::Deadlift),
      "bench" | "bench_press" => Ok(Self::Bench),
      "squat" => Ok(Self::Squat),
      _ => Err(format!("Unknown lift: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Prescriptions
/// ---------------------------------------------------------------------------

/// Rep scheme of a prescribed set. Either a plain count (`5`) or a marker
/// such as `"5+"` for an AMRAP set. Markers are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
  Count(u32),
  Marker(String),
}

impl Reps {
  pub fn is_amrap(&self) -> bool {
    matches!(self, Reps::Marker(m) if m.trim_end().ends_with('+'))
  }
}

impl std::fmt::Display for Reps {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Reps::Count(n) => write!(f, "{}", n),
      Reps::Marker(m) => f.write_str(m),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedSet {
  /// Fraction of the training max (0.65 = 65%)
  pub pct: f64,
  pub reps: Reps,
}

impl PrescribedSet {
  pub fn new(pct: f64, reps: Reps) -> Self {
    Self { pct, reps }
  }
}

/// Named set list for one week type, lightest set first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekScheme {
  pub week_type: u8,
  pub name: String,
  pub sets: Vec<PrescribedSet>,
}

/// ---------------------------------------------------------------------------
/// Program Layout
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
  pub day: u8,
  pub name: String,
  pub lift: Lift,
  pub focus: String,
}

/// Base training max and per-block increment for one lift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftConfig {
  pub lift: Lift,
  pub training_max: f64,
  pub increment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
  /// Hours without a logged session before the inactivity warning fires
  pub inactivity_hours: f64,
  /// First week-in-macro that raises the upcoming-deload warning
  pub deload_warning_week: u8,
}

impl Default for AlertThresholds {
  fn default() -> Self {
    Self {
      inactivity_hours: 48.0,
      deload_warning_week: 5,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramConfig {
  pub program_start: NaiveDate,
  pub lifts: Vec<LiftConfig>,
  pub days: Vec<DayConfig>,
  pub weeks: Vec<WeekScheme>,
  #[serde(default)]
  pub alerts: AlertThresholds,
}

impl ProgramConfig {
  pub fn lift(&self, lift: Lift) -> Option<&LiftConfig> {
    self.lifts.iter().find(|l| l.lift == lift)
  }

  pub fn day(&self, day: u8) -> Option<&DayConfig> {
    self.days.iter().find(|d| d.day == day)
  }

  /// Day lookup that falls back to the first configured day instead of
  /// failing. Only for callers that explicitly accept the fallback.
  pub fn day_or_first(&self, day: u8) -> Option<&DayConfig> {
    self.day(day).or_else(|| {
      let fallback = self.days.iter().min_by_key(|d| d.day);
      if let Some(first) = fallback {
        tracing::warn!(requested = day, fallback = first.day, "Unknown day, using first configured day");
      }
      fallback
    })
  }

  pub fn week(&self, week_type: u8) -> Option<&WeekScheme> {
    self.weeks.iter().find(|w| w.week_type == week_type)
  }

  /// Check the structural invariants the cycle math relies on:
  /// every day 1-4 and week type 1-4 is present exactly once, and every lift
  /// referenced by a day has a training max and increment.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut seen_lifts = BTreeSet::new();
    for l in &self.lifts {
      if !seen_lifts.insert(l.lift) {
        return Err(ConfigError::Duplicate {
          what: "lift",
          key: l.lift.to_string(),
        });
      }
      if !l.training_max.is_finite() || l.training_max <= 0.0 {
        return Err(ConfigError::InvalidValue {
          field: format!("lifts.{}.training_max", l.lift),
          reason: format!("must be a positive number, got {}", l.training_max),
        });
      }
      if !l.increment.is_finite() || l.increment < 0.0 {
        return Err(ConfigError::InvalidValue {
          field: format!("lifts.{}.increment", l.lift),
          reason: format!("must be zero or positive, got {}", l.increment),
        });
      }
    }

    let mut seen_days = BTreeSet::new();
    for d in &self.days {
      if !MICROCYCLE_DAYS.contains(&d.day) {
        return Err(ConfigError::DayOutOfRange(d.day));
      }
      if !seen_days.insert(d.day) {
        return Err(ConfigError::Duplicate {
          what: "day",
          key: d.day.to_string(),
        });
      }
      if self.lift(d.lift).is_none() {
        return Err(ConfigError::MissingLift {
          lift: d.lift,
          day: d.day,
        });
      }
    }
    if let Some(missing) = MICROCYCLE_DAYS.find(|d| !seen_days.contains(d)) {
      return Err(ConfigError::MissingDay(missing));
    }

    let mut seen_weeks = BTreeSet::new();
    for w in &self.weeks {
      if !WEEK_TYPES.contains(&w.week_type) {
        return Err(ConfigError::WeekOutOfRange(w.week_type));
      }
      if !seen_weeks.insert(w.week_type) {
        return Err(ConfigError::Duplicate {
          what: "week type",
          key: w.week_type.to_string(),
        });
      }
      if w.sets.is_empty() {
        return Err(ConfigError::EmptyWeek(w.week_type));
      }
      if let Some(bad) = w.sets.iter().find(|s| !s.pct.is_finite() || s.pct <= 0.0) {
        return Err(ConfigError::InvalidValue {
          field: format!("weeks.{}.sets.pct", w.week_type),
          reason: format!("must be a positive fraction, got {}", bad.pct),
        });
      }
    }
    if let Some(missing) = WEEK_TYPES.find(|w| !seen_weeks.contains(w)) {
      return Err(ConfigError::MissingWeek(missing));
    }

    if !(1..=7).contains(&self.alerts.deload_warning_week) {
      return Err(ConfigError::InvalidValue {
        field: "alerts.deload_warning_week".to_string(),
        reason: format!("must be within 1-7, got {}", self.alerts.deload_warning_week),
      });
    }
    if !self.alerts.inactivity_hours.is_finite() || self.alerts.inactivity_hours <= 0.0 {
      return Err(ConfigError::InvalidValue {
        field: "alerts.inactivity_hours".to_string(),
        reason: format!("must be positive, got {}", self.alerts.inactivity_hours),
      });
    }

    Ok(())
  }
}

/// The Boring But Big 5/3/1 layout the program started with
impl Default for ProgramConfig {
  fn default() -> Self {
    let lift = |lift, training_max, increment| LiftConfig {
      lift,
      training_max,
      increment,
    };
    let day = |day, name: &str, lift, focus: &str| DayConfig {
      day,
      name: name.to_string(),
      lift,
      focus: focus.to_string(),
    };
    let set = |pct, reps: u32| PrescribedSet::new(pct, Reps::Count(reps));
    let amrap = |pct, marker: &str| PrescribedSet::new(pct, Reps::Marker(marker.to_string()));

    Self {
      program_start: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap_or_default(),
      lifts: vec![
        lift(Lift::Ohp, 58.0, 2.0),
        lift(Lift::Deadlift, 140.0, 4.0),
        lift(Lift::Bench, 76.0, 2.0),
        lift(Lift::Squat, 80.0, 4.0),
      ],
      days: vec![
        day(1, "BBB Day 1 - OHP", Lift::Ohp, "Press + Shoulders"),
        day(2, "BBB Day 2 - Deadlift", Lift::Deadlift, "Deadlift"),
        day(3, "BBB Day 3 - Bench", Lift::Bench, "Bench Press"),
        day(4, "BBB Day 4 - Zercher", Lift::Squat, "Zercher Squat"),
      ],
      weeks: vec![
        WeekScheme {
          week_type: 1,
          name: "5s week".to_string(),
          sets: vec![set(0.65, 5), set(0.75, 5), amrap(0.85, "5+")],
        },
        WeekScheme {
          week_type: 2,
          name: "3s week".to_string(),
          sets: vec![set(0.70, 3), set(0.80, 3), amrap(0.90, "3+")],
        },
        WeekScheme {
          week_type: 3,
          name: "531 week".to_string(),
          sets: vec![set(0.75, 5), set(0.85, 3), amrap(0.95, "1+")],
        },
        WeekScheme {
          week_type: 4,
          name: "Deload".to_string(),
          sets: vec![set(0.40, 5), set(0.50, 5), set(0.60, 5)],
        },
      ],
      alerts: AlertThresholds::default(),
    }
  }
}
