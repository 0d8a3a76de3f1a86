use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::periodization::EngineError;

/// A logged workout as handed over by the session store. Every field is
/// optional; only the timestamp is required to turn it into a [`Session`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSession {
  pub exercise: Option<String>,
  pub date: Option<String>,
  pub day_label: Option<String>,
  /// Stores may hand this over as a float; it is truncated
  pub week: Option<f64>,
  pub top_weight: Option<f64>,
  pub reps: Option<String>,
  pub volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub exercise: String,
  pub date: DateTime<Utc>,
  pub day_label: String,
  /// Program week recorded at logging time
  pub week: u32,
  pub top_weight: f64,
  /// Free-form, e.g. "5/5/8"
  pub reps: String,
  pub volume: f64,
}

impl Session {
  /// Validate a whole log, tagging any failure with its position
  pub fn parse_log(raw: Vec<RawSession>) -> Result<Vec<Session>, EngineError> {
    raw
      .into_iter()
      .enumerate()
      .map(|(index, r)| {
        Session::try_from(r).map_err(|e| match e {
          EngineError::InvalidSession { reason, .. } => EngineError::InvalidSession {
            index: Some(index),
            reason,
          },
          other => other,
        })
      })
      .collect()
  }
}

impl TryFrom<RawSession> for Session {
  type Error = EngineError;

  fn try_from(raw: RawSession) -> Result<Self, Self::Error> {
    let date_str = raw
      .date
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .ok_or_else(|| EngineError::InvalidSession {
        index: None,
        reason: "missing timestamp".to_string(),
      })?;

    let date = parse_timestamp(date_str).map_err(|reason| EngineError::InvalidSession {
      index: None,
      reason,
    })?;

    Ok(Self {
      exercise: raw.exercise.unwrap_or_default(),
      date,
      day_label: raw.day_label.unwrap_or_default(),
      week: raw.week.filter(|w| w.is_finite()).map_or(0, |w| w.trunc() as u32),
      top_weight: raw.top_weight.unwrap_or(0.0),
      reps: raw.reps.unwrap_or_default(),
      volume: raw.volume.unwrap_or(0.0),
    })
  }
}

/// Parse a session timestamp. Accepts RFC 3339, a naive ISO datetime (read as
/// UTC), or a bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Ok(naive.and_utc());
  }
  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
      return Ok(midnight.and_utc());
    }
  }
  Err(format!("unparsable timestamp {:?}", s))
}
