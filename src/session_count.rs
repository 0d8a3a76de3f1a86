//! Where "sessions completed so far" comes from.
//!
//! The cycle math only needs a count. Two sources provide one:
//! - [`CalendarEstimate`] assumes four sessions in every full week since the
//!   program started
//! - [`LoggedSessions`] counts the training days actually present in the log

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

use crate::models::Session;
use crate::periodization::{EngineError, SESSIONS_PER_WEEK};

pub trait SessionCountSource {
    fn session_count(&self, now: DateTime<Utc>) -> Result<i64, EngineError>;
}

/// Calendar heuristic: `floor(days_since_start / 7) * 4`
#[derive(Debug, Clone, Copy)]
pub struct CalendarEstimate {
    pub program_start: NaiveDate,
}

impl SessionCountSource for CalendarEstimate {
    fn session_count(&self, now: DateTime<Utc>) -> Result<i64, EngineError> {
        let days = (now.date_naive() - self.program_start).num_days();
        let estimate = days.div_euclid(7) * SESSIONS_PER_WEEK as i64;
        if estimate < 0 {
            return Err(EngineError::NegativeSessionCount(estimate));
        }
        Ok(estimate)
    }
}

/// Counts distinct calendar days with at least one logged session on or after
/// the program start. A training day is usually logged as several exercises.
#[derive(Debug, Clone, Copy)]
pub struct LoggedSessions<'a> {
    pub program_start: NaiveDate,
    pub sessions: &'a [Session],
}

impl SessionCountSource for LoggedSessions<'_> {
    fn session_count(&self, now: DateTime<Utc>) -> Result<i64, EngineError> {
        let days: BTreeSet<NaiveDate> = self
            .sessions
            .iter()
            .filter(|s| s.date <= now)
            .map(|s| s.date.date_naive())
            .filter(|d| *d >= self.program_start)
            .collect();
        Ok(days.len() as i64)
    }
}
